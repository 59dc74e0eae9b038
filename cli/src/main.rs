//! # ggdk Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the ggdk CLI, a developer tool for building Greengrass
//! components and deploying them straight to a core device. It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each top-level command group is a variant of the `Commands` enum
//! - Groups map to handler functions in `commands/`
//! - All errors propagate to this level; the process prints `Error: <msg>` and
//!   exits with status 1
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! ggdk --help
//!
//! # Deploy with debug logging
//! ggdk -vv component local-deploy
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (component build, local-deploy, ...)
mod common; // Shared utilities (build, fs, process, recipe, remote)
mod core; // Configuration and errors

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "ggdk",
    about = "Greengrass component development kit",
    long_about = "Build Greengrass components and deploy, list or remove them on a core device\n\
                  directly over SSH, without publishing to the cloud.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "c")]
    Component(commands::component::ComponentArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Component(args) => commands::component::handle_component(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;

    fn ggdk_cmd() -> Command {
        Command::cargo_bin("ggdk").expect("Failed to find ggdk binary for testing")
    }

    #[test]
    fn test_main_help_flag() {
        ggdk_cmd().arg("--help").assert().success();
    }

    #[test]
    fn test_main_version_flag() {
        ggdk_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
