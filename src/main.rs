//! `govx`: turn a Principle / Requirement / Guidelines spreadsheet into an
//! interactive governance framework document.

use std::process::ExitCode;

mod cli;

fn main() -> ExitCode {
    let cli = cli::Cli::try_parse_args(std::env::args_os()).unwrap_or_else(|error| error.exit());

    match cli.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
