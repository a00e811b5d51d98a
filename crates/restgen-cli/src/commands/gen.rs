// Generate the REST scaffold

use std::collections::BTreeMap;

use restgen_generation::{
    execute_plan, OutputWriter, PackagePlanner, PlannerConfig, TemplateEngine, UniverseLoader,
    Verb, WriteResult,
};
use tracing::{debug, info, warn};

use crate::boilerplate::load_boilerplate;
use crate::commands::Command;
use crate::error::{CliError, CliResult};
use crate::router::GeneratorArgs;

/// Parse a comma-separated verb list such as `list,get`
pub fn parse_verbs(list: &str) -> CliResult<Vec<Verb>> {
    let mut verbs = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let verb: Verb = part
            .parse()
            .map_err(|e: String| CliError::invalid_argument(format!("--required-verbs: {}", e)))?;
        if !verbs.contains(&verb) {
            verbs.push(verb);
        }
    }
    Ok(verbs)
}

/// Parse `Singular=Plural` pairs into the planner's exception table
pub fn parse_plural_exceptions(entries: &[String]) -> CliResult<BTreeMap<String, String>> {
    let mut exceptions = BTreeMap::new();
    for entry in entries {
        let (singular, plural) = entry
            .split_once('=')
            .map(|(s, p)| (s.trim(), p.trim()))
            .filter(|(s, p)| !s.is_empty() && !p.is_empty())
            .ok_or_else(|| {
                CliError::invalid_argument(format!(
                    "--plural-exception expects SINGULAR=PLURAL, got '{}'",
                    entry
                ))
            })?;
        exceptions.insert(singular.to_string(), plural.to_string());
    }
    Ok(exceptions)
}

/// Load manifests, plan, render and write the scaffold
pub struct GenCommand {
    args: GeneratorArgs,
}

impl GenCommand {
    pub fn new(args: GeneratorArgs) -> Self {
        Self { args }
    }

    /// Check arguments before touching the filesystem
    fn validate(&self) -> CliResult<Vec<Verb>> {
        if self.args.output_package.trim().is_empty() {
            return Err(CliError::invalid_argument("--output-package cannot be empty"));
        }
        if self.args.input.is_empty() {
            return Err(CliError::invalid_argument("at least one --input manifest is required"));
        }
        parse_verbs(&self.args.required_verbs)
    }

    /// Planner configuration derived from the arguments and header bytes
    pub fn planner_config(&self, header: Vec<u8>) -> CliResult<PlannerConfig> {
        let required_verbs = self.validate()?;
        let plural_exceptions = parse_plural_exceptions(&self.args.plural_exceptions)?;
        let object_meta = match self.args.object_meta.trim() {
            "" => None,
            member => Some(member.to_string()),
        };

        Ok(PlannerConfig::new(self.args.output_package.trim())
            .with_header(header)
            .with_required_verbs(required_verbs)
            .with_object_meta_member(object_meta)
            .with_plural_exceptions(plural_exceptions))
    }

    /// Run the whole pipeline and report what was written
    pub fn run(&self) -> CliResult<WriteResult> {
        self.validate()?;
        let header = load_boilerplate(self.args.go_header_file.as_deref())?;
        let config = self.planner_config(header)?;

        let universe = UniverseLoader::load_all(&self.args.input)?;
        debug!(packages = universe.packages().len(), "Loaded type universe");

        let planner = PackagePlanner::new(config)?;
        let plan = planner.plan(&universe)?;
        if plan.is_empty() {
            warn!("No types selected for generation");
        }

        let files = execute_plan(&plan, &TemplateEngine::new())?;
        let writer = OutputWriter::new(&self.args.output_base, self.args.output_package.trim())
            .with_dry_run(self.args.dry_run);
        let result = writer.write_all(&files)?;

        info!(
            files = result.paths.len(),
            written = result.files_written,
            dry_run = result.dry_run,
            output_base = %writer.base().display(),
            "Generated scaffold"
        );
        Ok(result)
    }
}

impl Command for GenCommand {
    fn execute(&self) -> CliResult<()> {
        self.run().map(|_| ())
    }
}
