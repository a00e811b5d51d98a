// restgen CLI library

pub mod boilerplate;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod router;

pub use boilerplate::load_boilerplate;
pub use commands::{Command, GenCommand};
pub use error::{CliError, CliResult};
pub use logging::init_logging;
pub use router::{Cli, CommandRouter, GeneratorArgs};
