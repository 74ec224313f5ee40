use matfetch_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Initialize logging as early as possible; fall back to stderr if the state dir is unusable.
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }
    // Panic reports would otherwise tear the progress line.
    logging::route_panics_to_log();

    // Parse CLI and dispatch.
    match CliCommand::run_from_args().await {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("matfetch error: {:#}", err);
            std::process::exit(1);
        }
    }
}
