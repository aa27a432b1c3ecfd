//! prompt-hash command-line entry point

use std::process::ExitCode;

fn main() -> ExitCode {
    match prompt_hash::cli::main_entry() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
