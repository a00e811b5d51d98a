//! Package planning
//!
//! The planner turns a [`TypeUniverse`] into the ordered list of packages to
//! emit. Each source package is analysed on its own: types are selected
//! through the [`TagFilter`], the object-meta type is discovered, and group
//! and version are derived. The surviving types of every source package are
//! then merged into one ordered sequence feeding a single generated tree, built
//! in dependency order:
//!
//! 1. controller meta, service interface, middleware
//! 2. one controller package and one service file per type
//! 3. the server bootstrap
//!
//! Planning is pure and runs to completion before anything is rendered.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::error::GenerationError;
use crate::filter::{compare_types, TagFilter, DEFAULT_REQUIRED_VERBS};
use crate::models::{SourcePackage, TypeDeclaration, TypeName, TypeUniverse};
use crate::package::Package;
use crate::scaffold::{
    package_for_controller_meta, package_for_middleware, package_for_server,
    package_for_service_interface, package_for_type_controller, package_for_type_service,
    ScaffoldContext,
};
use crate::tags::{extract_comment_tags, Verb, DIRECTIVE_MARKER};
use crate::templates::VariableMap;

/// Member that carries object metadata unless configured otherwise
pub const DEFAULT_OBJECT_META_MEMBER: &str = "ObjectMeta";

/// Package-level directive overriding the API group
pub const GROUP_NAME_TAG: &str = "groupName";

/// Planner configuration
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Import path of the generated tree
    pub output_package: String,
    /// Header bytes prepended to every generated file
    pub header: Vec<u8>,
    /// Verbs a type must support to be generated
    pub required_verbs: Vec<Verb>,
    /// Member searched for object metadata; `None` disables discovery
    pub object_meta_member: Option<String>,
    /// Irregular plurals, keyed by public singular
    pub plural_exceptions: BTreeMap<String, String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            output_package: String::new(),
            header: Vec::new(),
            required_verbs: DEFAULT_REQUIRED_VERBS.to_vec(),
            object_meta_member: Some(DEFAULT_OBJECT_META_MEMBER.to_string()),
            plural_exceptions: BTreeMap::new(),
        }
    }
}

impl PlannerConfig {
    /// Configuration for `output_package` with defaults elsewhere
    pub fn new(output_package: impl Into<String>) -> Self {
        Self {
            output_package: output_package.into(),
            ..Self::default()
        }
    }

    /// Set the file header
    pub fn with_header(mut self, header: impl Into<Vec<u8>>) -> Self {
        self.header = header.into();
        self
    }

    /// Set the required verbs
    pub fn with_required_verbs(mut self, verbs: Vec<Verb>) -> Self {
        self.required_verbs = verbs;
        self
    }

    /// Set the object-meta member, or disable discovery with `None`
    pub fn with_object_meta_member(mut self, member: Option<String>) -> Self {
        self.object_meta_member = member;
        self
    }

    /// Set irregular plurals
    pub fn with_plural_exceptions(mut self, exceptions: BTreeMap<String, String>) -> Self {
        self.plural_exceptions = exceptions;
        self
    }
}

/// What the planner learned about one source package
#[derive(Debug, Clone)]
pub struct SourcePlan {
    /// Source package import path
    pub source_path: String,
    /// API group
    pub group: String,
    /// API version (empty for internal packages)
    pub version: String,
    /// Object metadata member lacks a `json` tag
    pub internal: bool,
    /// Type of the object-meta member, when discovery is enabled
    pub object_meta: Option<TypeName>,
    /// Selected types in deterministic order
    pub types: Vec<TypeDeclaration>,
}

impl SourcePlan {
    /// Template variables shared by every per-type file of this source
    pub fn vars(&self) -> VariableMap {
        let mut vars = VariableMap::new()
            .with("group", self.group.as_str())
            .with("version", self.version.as_str());
        if let Some(meta) = &self.object_meta {
            vars.insert("objectMeta", TypeDeclaration::new(meta.clone()));
        }
        vars
    }
}

/// Output of a planning run
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Import path of the generated tree
    pub output_package: String,
    /// One entry per source package that produced output
    pub sources: Vec<SourcePlan>,
    /// Selected types of every source, in emission order
    pub types: Vec<TypeDeclaration>,
    /// Packages in dependency order
    pub packages: Vec<Package>,
}

impl Plan {
    /// Every package, in emission order
    pub fn packages(&self) -> impl Iterator<Item = &Package> {
        self.packages.iter()
    }

    /// Number of planned packages
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Whether nothing will be generated
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Builds the ordered package plan for a type universe
#[derive(Debug, Clone)]
pub struct PackagePlanner {
    config: PlannerConfig,
    filter: TagFilter,
}

impl PackagePlanner {
    /// Create a planner, rejecting an empty output package
    pub fn new(config: PlannerConfig) -> Result<Self, GenerationError> {
        if config.output_package.trim().is_empty() {
            return Err(GenerationError::Configuration(
                "output package cannot be empty".to_string(),
            ));
        }
        let filter = TagFilter::new().with_required_verbs(config.required_verbs.clone());
        Ok(Self { config, filter })
    }

    /// Planner configuration
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan every source package of `universe` into one generated tree
    pub fn plan(&self, universe: &TypeUniverse) -> Result<Plan, GenerationError> {
        let mut sources = Vec::new();
        for source in universe.packages() {
            if let Some(planned) = self.plan_source(source)? {
                sources.push(planned);
            }
        }

        let shared = self.scaffold_context(VariableMap::new());
        let per_source: Vec<ScaffoldContext> = sources
            .iter()
            .map(|source| self.scaffold_context(source.vars()))
            .collect();

        let mut selected: Vec<(&TypeDeclaration, &ScaffoldContext)> = sources
            .iter()
            .zip(&per_source)
            .flat_map(|(source, ctx)| source.types.iter().map(move |t| (t, ctx)))
            .collect();
        selected.sort_by(|(a, _), (b, _)| compare_types(a, b));
        let types: Vec<TypeDeclaration> = selected.iter().map(|(t, _)| (*t).clone()).collect();

        let mut packages = Vec::new();
        if !types.is_empty() {
            packages.push(package_for_controller_meta(&shared));
            packages.push(package_for_service_interface(&shared, &types));
            packages.push(package_for_middleware(&shared));
            for (declaration, ctx) in &selected {
                packages.push(package_for_type_controller(ctx, declaration));
                packages.push(package_for_type_service(ctx, declaration));
            }
            packages.push(package_for_server(&shared, &types));
        }

        for package in &packages {
            for generator in &package.generators {
                generator
                    .check_template_order()
                    .map_err(|source| GenerationError::Template {
                        generator: generator.id().to_string(),
                        source,
                    })?;
            }
            info!(
                package = %package.path,
                kind = %package.kind,
                generators = package.generators.len(),
                "planned package"
            );
        }

        let plan = Plan {
            output_package: self.config.output_package.clone(),
            sources,
            types,
            packages,
        };
        check_output_collisions(&plan)?;
        info!(
            sources = plan.sources.len(),
            types = plan.types.len(),
            packages = plan.package_count(),
            "planning complete"
        );
        Ok(plan)
    }

    /// Analyse one source package; `Ok(None)` when nothing in it is selected
    pub fn plan_source(&self, source: &SourcePackage) -> Result<Option<SourcePlan>, GenerationError> {
        let selected = self.filter.select(source)?;
        let object_meta = self.object_meta_for(source)?;

        if selected.is_empty() {
            warn!(package = %source.path, "no types selected, skipping source package");
            return Ok(None);
        }

        let internal = object_meta.as_ref().is_some_and(|(_, internal)| *internal);
        let (group, version) = group_version(source, internal);
        debug!(
            package = %source.path,
            group = %group,
            version = %version,
            types = selected.len(),
            "selected source package"
        );

        Ok(Some(SourcePlan {
            source_path: source.path.clone(),
            group,
            version,
            internal,
            object_meta: object_meta.map(|(meta, _)| meta),
            types: selected.into_iter().cloned().collect(),
        }))
    }

    fn scaffold_context(&self, vars: VariableMap) -> ScaffoldContext {
        ScaffoldContext::new(self.config.output_package.as_str(), &self.config.header)
            .with_source_vars(vars)
            .with_plural_exceptions(self.config.plural_exceptions.clone())
    }

    /// Find the object-meta member type among generate-enabled types.
    ///
    /// Returns the member type and whether it is internal (no `json` tag).
    fn object_meta_for(
        &self,
        source: &SourcePackage,
    ) -> Result<Option<(TypeName, bool)>, GenerationError> {
        let Some(member_name) = self.config.object_meta_member.as_deref() else {
            return Ok(None);
        };

        let mut generating = false;
        for declaration in &source.types {
            if !self
                .filter
                .tags_for(declaration)?
                .is_some_and(|tags| tags.generate)
            {
                continue;
            }
            generating = true;
            if let Some(member) = declaration.member(member_name) {
                debug!(
                    package = %source.path,
                    type_name = %declaration.name,
                    object_meta = %member.type_name,
                    "found object meta"
                );
                return Ok(Some((member.type_name.clone(), !member.tags.contains("json"))));
            }
        }

        if generating {
            return Err(GenerationError::MissingObjectMeta {
                package: source.path.clone(),
                member: member_name.to_string(),
            });
        }
        Ok(None)
    }
}

/// Group and version of a source package.
///
/// External packages take the last two path segments; internal ones use the
/// last segment as the group and no version. A `+groupName=` package comment
/// overrides the group with its first dotted component.
pub fn group_version(source: &SourcePackage, internal: bool) -> (String, String) {
    let segments: Vec<&str> = source.path.split('/').filter(|s| !s.is_empty()).collect();
    let (mut group, version) = match segments.as_slice() {
        [.., group, version] if !internal => (group.to_string(), version.to_string()),
        [.., last] => (last.to_string(), String::new()),
        [] => (String::new(), String::new()),
    };

    let marker = DIRECTIVE_MARKER.to_string();
    if let Some(name) = extract_comment_tags(&marker, source.comments.as_slice())
        .get(GROUP_NAME_TAG)
        .and_then(|values| values.first())
    {
        group = name.split('.').next().unwrap_or(name).to_string();
    }
    (group, version)
}

fn check_output_collisions(plan: &Plan) -> Result<(), GenerationError> {
    let mut seen = BTreeSet::new();
    for package in plan.packages() {
        for stem in package.output_stems() {
            if !seen.insert((package.path.as_str(), stem)) {
                return Err(GenerationError::OutputCollision {
                    path: package.path.clone(),
                    stem: stem.to_string(),
                });
            }
        }
    }
    Ok(())
}
