//! Command-line client for the Spindle status-bar daemon.
//!
//! The client owns argument parsing, configuration bootstrapping, message
//! encoding, and the single request/response exchange with `spindled`. The
//! runtime takes its IO streams and configuration loader as parameters so
//! tests can substitute both.

use std::ffi::OsString;
use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use spindle_config::Config;
use spindle_protocol::{encode_message, failure_diagnostic};

mod cli;
mod config;
mod errors;
mod transport;

use cli::Cli;
use config::{ConfigArgumentSplit, split_config_arguments};
pub(crate) use config::{ConfigLoader, OrthoConfigLoader};
pub(crate) use errors::{AppError, ExchangeStage};
use transport::connect;

/// Leading flags handed to the configuration loader.
///
/// MAINTENANCE: keep in step with the value-taking fields of
/// `spindle_config::Config`.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--daemon-socket",
    "--log-filter",
    "--log-format",
];

/// Runs the client using the provided arguments and IO handles.
#[must_use]
pub fn run<I, W, E>(args: I, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdout, stderr, &OrthoConfigLoader)
}

/// Runs the client with a custom configuration loader.
pub(crate) fn run_with_loader<I, W, E, L>(
    args: I,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_config_arguments(&args);

    let result = Cli::try_parse_from(prepare_cli_arguments(&args, &split))
        .map_err(AppError::Usage)
        .and_then(|cli| {
            loader
                .load(&split.config_arguments)
                .map(|config| (cli, config))
        })
        .and_then(|(cli, config)| send_message(&cli, &config))
        .and_then(|response| relay_response(&response, stdout, stderr));

    match result {
        Ok(exit_code) => exit_code,
        Err(AppError::Usage(error))
            if matches!(error.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) =>
        {
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            if error.is_daemon_down() {
                let _ = writeln!(
                    stderr,
                    "hint: start spindled or point --daemon-socket at a running daemon"
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn prepare_cli_arguments(args: &[OsString], split: &ConfigArgumentSplit) -> Vec<OsString> {
    args.first()
        .into_iter()
        .chain(args.iter().skip(split.command_start))
        .cloned()
        .collect()
}

fn send_message(cli: &Cli, config: &Config) -> Result<Vec<u8>, AppError> {
    let message = encode_message(cli.fields())?;
    connect(config.daemon_socket())?.exchange(&message)
}

/// Copies a successful answer to `stdout`; failures go to `stderr` without
/// the marker and exit non-zero.
fn relay_response<W, E>(
    response: &[u8],
    stdout: &mut W,
    stderr: &mut E,
) -> Result<ExitCode, AppError>
where
    W: Write,
    E: Write,
{
    let text = String::from_utf8_lossy(response);
    if let Some(diagnostic) = failure_diagnostic(&text) {
        stderr
            .write_all(diagnostic.as_bytes())
            .and_then(|()| stderr.flush())
            .map_err(AppError::exchange(ExchangeStage::Relay))?;
        return Ok(ExitCode::FAILURE);
    }
    stdout
        .write_all(response)
        .and_then(|()| stdout.flush())
        .map_err(AppError::exchange(ExchangeStage::Relay))?;
    Ok(ExitCode::SUCCESS)
}
