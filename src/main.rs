//! blockdupe - Incremental Duplicate File Finder
//!
//! Entry point for the blockdupe CLI application.

use blockdupe::{cli::Cli, error::ExitCode};
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    match blockdupe::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::GeneralError;
            eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
            std::process::exit(exit_code.as_i32());
        }
    }
}
