// Folder Sync
// Command line entry point for two-way directory synchronization

// MODULES ------------------>>

mod cli;

//--------------------------------------------------------<<
// IMPORTS ------------------>>

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use std::io::{self, IsTerminal};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use folder_sync::core::{App, AppConfig, ProjectConfig};
use folder_sync::ui::{ConsoleReporter, TerminalConfirm};

//--------------------------------------------------------<<

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                 MAIN ENTRY POINT                                                 │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            let label = if io::stderr().is_terminal() {
                "error".red().bold().to_string()
            } else {
                "error".to_string()
            };
            eprintln!("{label}: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli) -> Result<u8> {
    let config = load_config(cli)?;
    debug!(?config, "Effective configuration");

    let app = App::new(config)?;
    let mut confirm = TerminalConfirm;
    let mut reporter = ConsoleReporter::stdout();

    let outcome = app.run(&cli.dir1, &cli.dir2, cli.mode(), &mut confirm, &mut reporter)?;
    debug!(?outcome, "Run finished");

    Ok(u8::try_from(outcome.exit_code()).unwrap_or(1))
}

// ┌──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┐
// │                                                      SETUP                                                       │
// └──────────────────────────────────────────────────────────────────────────────────────────────────────────────────┘

/// Logs go to stderr; RUST_LOG overrides the verbosity flag
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(verbose)
        .init();
}

/// Defaults, then the project file, then command line flags
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    let project = match &cli.config {
        Some(path) => Some(ProjectConfig::load(path)?),
        None => {
            let cwd = std::env::current_dir().context("Failed to read working directory")?;
            ProjectConfig::discover(&cwd)?
        }
    };
    if let Some(project) = project {
        project.apply_to(&mut config);
    }

    cli.apply_to(&mut config);
    Ok(config)
}
