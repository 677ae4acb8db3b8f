//! CLI argument definitions for the Spindle client.

use clap::Parser;

/// Sends one control message to `spindled` and prints the answer.
#[derive(Parser, Debug)]
#[command(name = "spindle", version)]
pub(crate) struct Cli {
    /// The message domain (for example `config`).
    #[arg(value_name = "DOMAIN")]
    pub(crate) domain: String,
    /// The command within the domain (for example `debug_output`).
    #[arg(value_name = "COMMAND")]
    pub(crate) command: String,
    /// Arguments forwarded to the daemon unchanged.
    #[arg(
        value_name = "ARG",
        num_args = 0..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub(crate) arguments: Vec<String>,
}

impl Cli {
    /// Fields in wire order: domain, command, then arguments.
    pub(crate) fn fields(&self) -> impl Iterator<Item = &str> {
        [self.domain.as_str(), self.command.as_str()]
            .into_iter()
            .chain(self.arguments.iter().map(String::as_str))
    }
}
