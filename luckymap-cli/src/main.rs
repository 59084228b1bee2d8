//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use std::process::ExitCode;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    match luckymap_cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(luckymap_cli::CliError::ArgumentParsing(err)) => {
            // Help and version requests arrive as clap errors too.
            if let Err(io_err) = err.print() {
                log::warn!("failed to print usage: {io_err}");
            }
            if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "final error report for the user")]
fn report(err: &luckymap_cli::CliError) {
    eprintln!("luckymap: {err}");
}
