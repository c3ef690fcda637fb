//! Binary entry point for `ssw`.

use std::process::ExitCode;

fn main() -> ExitCode {
    storage_sweeper::cli_app::run()
}
