// file: src/main.rs
// version: 0.3.0
// guid: 4c1d9b2e-7f3a-4e60-9b82-51a6c0d47e19

//! Onboard environment helper - Main entry point

use clap::Parser;
use onboard_env::{
    cli::{args::Cli, commands},
    docker::DockerCli,
    logging::logger,
    utils::system::SystemUtils,
    Result,
};
use tokio::signal;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    let shutdown_signal = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        warn!("Received Ctrl+C, aborting...");
    };

    tokio::select! {
        result = run(cli) => {
            if let Err(err) = result {
                error!("{}", err);
                std::process::exit(err.exit_code());
            }
        }
        _ = shutdown_signal => {
            // Detached containers keep running; there is nothing to tear down here.
            std::process::exit(130); // Standard exit code for Ctrl+C
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Every subcommand shells out to docker, so fail fast when it is missing
    // or the invoking user cannot talk to the daemon.
    DockerCli::ensure_installed()?;
    SystemUtils::ensure_docker_group()?;

    commands::dispatch(cli).await
}
