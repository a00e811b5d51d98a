// Argument parsing and dispatch

use std::path::PathBuf;

use clap::{Args, Parser};

use crate::commands::{Command, GenCommand};
use crate::error::CliResult;

/// restgen - REST server scaffolding from annotated types
#[derive(Parser, Debug, Clone)]
#[command(name = "restgen")]
#[command(bin_name = "restgen")]
#[command(about = "Generate REST server scaffolding from annotated type declarations")]
#[command(
    long_about = "restgen reads a manifest of annotated type declarations and writes a \
REST server scaffold: one controller and service per selected type, a shared \
service interface, an auth middleware and the server bootstrap."
)]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub generator: GeneratorArgs,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Explicit log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

/// Generation options
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GeneratorArgs {
    /// Import path of the generated tree
    #[arg(long, value_name = "PATH")]
    pub output_package: String,

    /// License boilerplate prepended to every file; `YEAR` is replaced
    #[arg(long, value_name = "FILE")]
    pub go_header_file: Option<PathBuf>,

    /// Type manifests (YAML or JSON)
    #[arg(long, value_name = "FILE", required = true, num_args = 1..)]
    pub input: Vec<PathBuf>,

    /// Directory the generated tree is written under
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_base: PathBuf,

    /// Verbs a type must support to be generated (comma separated)
    #[arg(long, value_name = "VERBS", default_value = "list,get")]
    pub required_verbs: String,

    /// Member every package needs on at least one type; empty disables the check
    #[arg(long, value_name = "NAME", default_value = "ObjectMeta")]
    pub object_meta: String,

    /// Irregular plural for a type, e.g. `Endpoints=Endpoints` (repeatable)
    #[arg(long = "plural-exception", value_name = "SINGULAR=PLURAL")]
    pub plural_exceptions: Vec<String>,

    /// Plan and render without writing files
    #[arg(long)]
    pub dry_run: bool,
}

impl GeneratorArgs {
    /// Arguments with defaults for everything but the output package and inputs
    pub fn new(output_package: impl Into<String>, input: Vec<PathBuf>) -> Self {
        Self {
            output_package: output_package.into(),
            go_header_file: None,
            input,
            output_base: PathBuf::from("."),
            required_verbs: "list,get".to_string(),
            object_meta: "ObjectMeta".to_string(),
            plural_exceptions: Vec::new(),
            dry_run: false,
        }
    }
}

/// Routes parsed arguments to the generation command
pub struct CommandRouter;

impl CommandRouter {
    /// Run the command described by `cli`
    pub fn execute(cli: &Cli) -> CliResult<()> {
        GenCommand::new(cli.generator.clone()).execute()
    }
}
