// File: src/main.rs
//
// Main entry point for the rizz interpreter.
// Handles command-line argument parsing and dispatches to the appropriate
// subcommand (run or check).

use clap::{Parser as ClapParser, Subcommand};
use colored::Colorize;
use rizz::RunError;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(
    name = "rizz",
    about = "rizz: a tree-walking interpreter for rizz-sharp programs",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Run a rizz script file
    Run {
        /// Path to the .rizzler file
        file: PathBuf,

        /// Color diagnostics and error labels
        #[arg(long)]
        color: bool,
    },

    /// Parse a rizz script file and report diagnostics without running it
    Check {
        /// Path to the .rizzler file
        file: PathBuf,

        /// Color diagnostics and error labels
        #[arg(long)]
        color: bool,
    },
}

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RIZZ_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn read_source(file: &Path, color: bool) -> Option<String> {
    match fs::read_to_string(file) {
        Ok(source) => Some(source),
        Err(err) => {
            tracing::debug!(path = %file.display(), error = %err, "read failed");
            print_error(&format!("Could not find file {}", file.display()), color);
            None
        }
    }
}

fn print_error(message: &str, color: bool) {
    let label = if color { "error:".red().bold().to_string() } else { "error:".to_string() };
    eprintln!("{} {}", label, message);
}

fn report(result: Result<(), RunError>, color: bool) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        // parse reports already carry their own labels
        Err(RunError::Parse(report)) => {
            eprint!("{}", report);
            ExitCode::FAILURE
        }
        Err(RunError::Runtime(err)) => {
            print_error(&err.to_string(), color);
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { file, color } => {
            let Some(source) = read_source(&file, color) else {
                return ExitCode::FAILURE;
            };
            report(rizz::run(&source, color, None), color)
        }

        Commands::Check { file, color } => {
            let Some(source) = read_source(&file, color) else {
                return ExitCode::FAILURE;
            };
            report(rizz::check(&source, color), color)
        }
    }
}
