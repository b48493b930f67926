mod cli;
mod examples;
mod glue;
mod release;
mod test_suite;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "warn,thoth_build=info,thoth_build_core=info";

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let root = match resolve_root(cli.root) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Failed to get current directory: {e}");
            return ExitCode::from(1);
        }
    };

    match cli.command {
        Commands::Examples(args) => {
            if let Err(e) = examples::run(&args, &root) {
                ui::log_error("Examples task failed", &e);
                return ExitCode::from(1);
            }
        }
        Commands::Test(args) => {
            if let Err(e) = test_suite::run(&args, &root) {
                ui::log_error("Tests failed", &e);
                return ExitCode::from(1);
            }
        }
        Commands::Release(args) => {
            if let Err(e) = release::run(&args, &root) {
                ui::log_error("Release failed", &e);
                return ExitCode::from(1);
            }
        }
        Commands::Glue(args) => {
            if let Err(e) = glue::run(&args, &root) {
                ui::log_error("Failed to create binding", &e);
                return ExitCode::from(1);
            }
        }
    }
    ExitCode::SUCCESS
}

/// `RUST_LOG` wins over both the default filter and `--verbose`.
fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { DEFAULT_LOG_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn resolve_root(root: Option<PathBuf>) -> std::io::Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(match root {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => cwd.join(dir),
        None => cwd,
    })
}
