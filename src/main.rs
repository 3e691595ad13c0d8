//! CRM CLI - Customer relationship management from the command line

use std::process::ExitCode;

fn main() -> ExitCode {
    if let Err(e) = crm_cli::cli::run() {
        eprintln!("Error: {:#}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
