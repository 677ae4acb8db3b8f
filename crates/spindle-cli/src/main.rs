//! CLI entrypoint for the Spindle control client.
//!
//! The binary delegates to [`spindle_cli::run`], which loads configuration,
//! encodes the positional arguments as one control message, and relays the
//! daemon's answer.

use std::io::{self, StderrLock, StdoutLock};
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdout: StdoutLock<'_> = io::stdout().lock();
    let mut stderr: StderrLock<'_> = io::stderr().lock();
    spindle_cli::run(std::env::args_os(), &mut stdout, &mut stderr)
}
