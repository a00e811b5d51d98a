// Logging setup
//
// Library crates log through `tracing`; the binary installs a single fmt
// subscriber on stderr so stdout only carries the completion line.

use std::str::FromStr;

use tracing::Level;

use crate::error::{CliError, CliResult};

/// Pick the log level from CLI flags
///
/// An explicit `--log-level` wins over `--verbose` / `--quiet`.
pub fn resolve_level(verbose: bool, quiet: bool, log_level: Option<&str>) -> CliResult<Level> {
    if let Some(name) = log_level {
        return Level::from_str(name.trim())
            .map_err(|_| CliError::invalid_argument(format!("unknown log level '{}'", name)));
    }

    Ok(if quiet {
        Level::ERROR
    } else if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    })
}

/// Initialize logging based on CLI flags
pub fn init_logging(verbose: bool, quiet: bool, log_level: Option<&str>) -> CliResult<()> {
    let level = resolve_level(verbose, quiet, log_level)?;

    // A subscriber may already be installed (tests, embedding callers)
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(level >= Level::DEBUG)
        .with_writer(std::io::stderr)
        .try_init();

    Ok(())
}
