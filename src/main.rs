//! CLI binary for `todo_core`.
//!
//! This binary is a thin wrapper that parses arguments and delegates to the
//! library.

use clap::Parser;
use std::process::ExitCode;
use todo_core::cli::{run, Cli};

fn main() -> ExitCode {
    let output = run(Cli::parse());

    for line in output.stdout {
        println!("{line}");
    }
    for msg in output.stderr {
        eprintln!("{msg}");
    }

    output.exit_code
}
