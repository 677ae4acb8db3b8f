//! Configuration loading for the Spindle client.
//!
//! Leading flags that `ortho-config` understands are peeled off the argument
//! list before `clap` sees the rest, so `--daemon-socket` can sit in front of
//! the domain without clashing with the message arguments after it.

use std::ffi::{OsStr, OsString};

use spindle_config::Config;

use crate::AppError;

pub(crate) trait ConfigLoader {
    /// Loads configuration from the filtered configuration arguments.
    ///
    /// Only flags appearing before the first positional argument reach the
    /// loader. A configuration flag written after the domain is forwarded to
    /// the daemon as a message argument.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::Configuration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Stop,
}

fn classify(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Stop;
    }
    let (flag, inline) = match text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (text.as_ref(), false),
    };
    if super::CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !inline,
        }
    } else {
        FlagAction::Stop
    }
}

/// Arguments destined for the loader, and where the message tokens begin.
#[derive(Debug)]
pub(crate) struct ConfigArgumentSplit {
    pub(crate) config_arguments: Vec<OsString>,
    pub(crate) command_start: usize,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((binary, rest)) = args.split_first() else {
        return ConfigArgumentSplit {
            config_arguments: Vec::new(),
            command_start: 0,
        };
    };

    let mut config_arguments = vec![binary.clone()];
    let mut command_start = 1_usize;
    let mut awaiting_value = false;
    for argument in rest {
        if awaiting_value {
            awaiting_value = false;
        } else {
            match classify(argument) {
                FlagAction::Include { needs_value } => awaiting_value = needs_value,
                FlagAction::Stop => break,
            }
        }
        config_arguments.push(argument.clone());
        command_start += 1;
    }

    ConfigArgumentSplit {
        config_arguments,
        command_start,
    }
}
