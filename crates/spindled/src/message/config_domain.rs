//! Command table for the `config` domain.
//!
//! Each command shares one name between its query and mutation forms: with no
//! argument the current value is written back, with an argument the value is
//! coerced and stored. The table below maps command names to the kind of
//! value they take and to the store accessors that read and write it.

use crate::state::SettingsStore;

use super::coerce::{self, CoercionError};
use super::errors::MessageError;
use super::lexer::{Lexer, Token};
use super::response::ResponseSink;

/// Name of the configuration domain.
pub const CONFIG_DOMAIN: &str = "config";

/// Number of icons the power strip must hold (charging, discharging).
pub const POWER_STRIP_LEN: usize = 2;

/// What a command does with its argument.
#[derive(Clone, Copy)]
pub enum ConfigAction {
    /// `on` / `off` flag.
    Toggle {
        get: fn(&dyn SettingsStore) -> bool,
        set: fn(&mut dyn SettingsStore, bool),
    },
    /// Free-form text read verbatim from the rest of the field.
    RawText {
        get: fn(&dyn SettingsStore) -> &str,
        set: fn(&mut dyn SettingsStore, String),
    },
    /// Non-zero ARGB colour scanned as hexadecimal.
    Color {
        get: fn(&dyn SettingsStore) -> u32,
        set: fn(&mut dyn SettingsStore, u32),
    },
    /// Single glyph string; unset glyphs query as an empty line.
    Glyph {
        get: fn(&dyn SettingsStore) -> Option<&str>,
        set: fn(&mut dyn SettingsStore, String),
    },
    /// Every remaining token as an ordered list. The setter returns the
    /// stored length, which is checked against `required` after storing.
    IconList {
        set: fn(&mut dyn SettingsStore, Vec<String>) -> usize,
        required: Option<usize>,
    },
}

/// One entry of the command table.
#[derive(Clone, Copy)]
pub struct ConfigCommand {
    pub name: &'static str,
    pub action: ConfigAction,
}

/// Commands understood by the `config` domain.
pub const CONFIG_COMMANDS: &[ConfigCommand] = &[
    ConfigCommand {
        name: "debug_output",
        action: ConfigAction::Toggle {
            get: |store| store.debug_output(),
            set: |store, enabled| store.set_debug_output(enabled),
        },
    },
    ConfigCommand {
        name: "status_bar_text_font",
        action: ConfigAction::RawText {
            get: |store| store.text_font(),
            set: |store, font| store.set_text_font(font),
        },
    },
    ConfigCommand {
        name: "status_bar_icon_font",
        action: ConfigAction::RawText {
            get: |store| store.icon_font(),
            set: |store, font| store.set_icon_font(font),
        },
    },
    ConfigCommand {
        name: "status_bar_background_color",
        action: ConfigAction::Color {
            get: |store| store.background_color(),
            set: |store, color| store.set_background_color(color),
        },
    },
    ConfigCommand {
        name: "status_bar_foreground_color",
        action: ConfigAction::Color {
            get: |store| store.foreground_color(),
            set: |store, color| store.set_foreground_color(color),
        },
    },
    ConfigCommand {
        name: "status_bar_space_icon_strip",
        action: ConfigAction::IconList {
            set: |store, icons| {
                store.set_space_icon_strip(icons);
                store.space_icon_strip().len()
            },
            required: None,
        },
    },
    ConfigCommand {
        name: "status_bar_power_icon_strip",
        action: ConfigAction::IconList {
            set: |store, icons| store.set_power_icon_strip(icons),
            required: Some(POWER_STRIP_LEN),
        },
    },
    ConfigCommand {
        name: "status_bar_space_icon",
        action: ConfigAction::Glyph {
            get: |store| store.space_icon(),
            set: |store, icon| store.set_space_icon(icon),
        },
    },
    ConfigCommand {
        name: "status_bar_clock_icon",
        action: ConfigAction::Glyph {
            get: |store| store.clock_icon(),
            set: |store, icon| store.set_clock_icon(icon),
        },
    },
];

/// Looks up a command by exact name.
pub fn find_command(command: &Token<'_>) -> Option<&'static ConfigCommand> {
    CONFIG_COMMANDS.iter().find(|entry| command.matches(entry.name))
}

/// Handles the command and arguments following a `config` domain token.
pub fn handle(
    store: &mut dyn SettingsStore,
    sink: &mut ResponseSink<'_>,
    domain: Token<'_>,
    lexer: &mut Lexer<'_>,
) {
    let command = lexer.next_token();
    let Some(entry) = find_command(&command) else {
        sink.fail(&MessageError::unknown_command(domain.lossy(), command.lossy()));
        return;
    };

    let context = CommandContext { domain, command };
    if let Err(error) = context.run(entry.action, store, sink, lexer) {
        sink.fail(&error);
    }
}

struct CommandContext<'m> {
    domain: Token<'m>,
    command: Token<'m>,
}

impl CommandContext<'_> {
    fn run(
        &self,
        action: ConfigAction,
        store: &mut dyn SettingsStore,
        sink: &mut ResponseSink<'_>,
        lexer: &mut Lexer<'_>,
    ) -> Result<(), MessageError> {
        match action {
            ConfigAction::Toggle { get, set } => {
                let value = lexer.next_token();
                if value.is_valid() {
                    let enabled = coerce::parse_toggle(&value)
                        .map_err(|error| self.reject(error, &value))?;
                    set(store, enabled);
                } else {
                    sink.write_value(coerce::toggle_str(get(store)));
                }
            }
            ConfigAction::RawText { get, set } => {
                let value = lexer.remainder();
                if value.is_valid() {
                    let text = coerce::owned_string(&value)
                        .map_err(|error| self.reject(error, &value))?;
                    set(store, text);
                } else {
                    sink.write_value(get(store));
                }
            }
            ConfigAction::Color { get, set } => {
                let value = lexer.next_token();
                if value.is_valid() {
                    let color = coerce::parse_color(&value)
                        .map_err(|error| self.reject(error, &value))?;
                    set(store, color);
                } else {
                    sink.write_value(format_args!("{:#x}", get(store)));
                }
            }
            ConfigAction::Glyph { get, set } => {
                let value = lexer.next_token();
                if value.is_valid() {
                    let glyph = coerce::owned_string(&value)
                        .map_err(|error| self.reject(error, &value))?;
                    set(store, glyph);
                } else {
                    sink.write_value(get(store).unwrap_or_default());
                }
            }
            ConfigAction::IconList { set, required } => {
                let icons = coerce::collect_strings(lexer)
                    .map_err(|(value, error)| self.reject(error, &value))?;
                let stored = set(store, icons);
                if let Some(expected) = required
                    && stored != expected
                {
                    return Err(MessageError::list_length(
                        self.command.lossy(),
                        expected,
                        stored,
                    ));
                }
            }
        }
        Ok(())
    }

    fn reject(&self, error: CoercionError, value: &Token<'_>) -> MessageError {
        match error {
            CoercionError::Encoding => {
                MessageError::invalid_encoding(self.domain.lossy(), self.command.lossy())
            }
            CoercionError::Toggle | CoercionError::Color => MessageError::unknown_value(
                self.domain.lossy(),
                self.command.lossy(),
                value.lossy(),
            ),
        }
    }
}
