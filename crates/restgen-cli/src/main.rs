// restgen CLI entry point

use clap::Parser;

use restgen_cli::{init_logging, output, Cli, CommandRouter};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_level.as_deref()) {
        output::print_error(&e.user_message());
        std::process::exit(1);
    }

    if let Err(e) = CommandRouter::execute(&cli) {
        tracing::debug!(details = %e.technical_details(), "Generation failed");
        output::print_error(&e.user_message());
        std::process::exit(1);
    }

    output::print_success("Completed successfully.");
}
