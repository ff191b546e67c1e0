/*!
The `chemlang` binary entry point: `chemlang [SCRIPT]` runs a script file
and exits 0 on success or nonzero on any surfaced error; with no script
path, it starts the REPL (`crate::repl`).
*/

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// A small, dynamically-typed interpreted language for chemistry homework.
#[derive(Parser)]
#[command(name = "chemlang", version, about)]
struct Cli {
    /// Path to a `.cl` script to run. Omit to start the REPL.
    script: Option<PathBuf>,

    /// Raise the log level (tracing spans over scanning, balancing, and
    /// conversion-pipeline branch selection).
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "chemlang=debug" } else { "chemlang=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.script {
        Some(path) => run_script(&path),
        None => {
            chemlang::repl::run();
            ExitCode::SUCCESS
        }
    }
}

fn run_script(path: &std::path::Path) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("could not read `{}`: {e}", path.display());
            return ExitCode::FAILURE;
        }
    };
    let interpreter = chemlang::interpreter::Interpreter::new();
    match chemlang::run_source(&interpreter, &source) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
