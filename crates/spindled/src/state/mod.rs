//! Daemon-owned state reached by control messages.
//!
//! [`DaemonState`] is the single owner of every setting the `config` domain
//! can touch. It lives on the event loop thread and is lent to the dispatcher
//! one message at a time, which keeps all mutation single-writer.

mod bar;

pub use bar::{
    BarConfig, BarRenderer, DEFAULT_BACKGROUND_COLOR, DEFAULT_FOREGROUND_COLOR, DEFAULT_ICON_FONT,
    DEFAULT_TEXT_FONT, StatusBar, TracingRenderer,
};
#[cfg(test)]
pub(crate) use bar::MockBarRenderer;

/// Setter and getter contract the dispatcher relies on.
pub trait SettingsStore {
    /// Whether verbose daemon output is enabled.
    fn debug_output(&self) -> bool;
    /// Enables or disables verbose daemon output.
    fn set_debug_output(&mut self, enabled: bool);

    /// Font used for bar text.
    fn text_font(&self) -> &str;
    /// Stores a new text font and redraws.
    fn set_text_font(&mut self, font: String);

    /// Font used for bar icons.
    fn icon_font(&self) -> &str;
    /// Stores a new icon font and redraws.
    fn set_icon_font(&mut self, font: String);

    /// Current ARGB background colour.
    fn background_color(&self) -> u32;
    /// Stores a background colour and redraws.
    fn set_background_color(&mut self, color: u32);

    /// Current ARGB foreground colour.
    fn foreground_color(&self) -> u32;
    /// Stores a foreground colour and redraws.
    fn set_foreground_color(&mut self, color: u32);

    /// Icons shown per space, in order.
    fn space_icon_strip(&self) -> &[String];
    /// Replaces the per-space icons and redraws.
    fn set_space_icon_strip(&mut self, icons: Vec<String>);

    /// Icons shown for the power indicator.
    fn power_icon_strip(&self) -> &[String];
    /// Replaces the power strip and returns the number of stored entries.
    fn set_power_icon_strip(&mut self, icons: Vec<String>) -> usize;

    /// Glyph for the active space, if one was set.
    fn space_icon(&self) -> Option<&str>;
    /// Stores the active-space glyph and redraws.
    fn set_space_icon(&mut self, icon: String);

    /// Glyph shown before the clock, if one was set.
    fn clock_icon(&self) -> Option<&str>;
    /// Stores the clock glyph and redraws.
    fn set_clock_icon(&mut self, icon: String);
}

/// Process-wide settings owned by the event loop.
#[derive(Debug, Default)]
pub struct DaemonState {
    debug_output: bool,
    bar: StatusBar,
}

impl DaemonState {
    /// Creates state with the given verbosity flag and bar.
    pub fn new(debug_output: bool, bar: StatusBar) -> Self {
        Self { debug_output, bar }
    }

    /// Status bar owned by the daemon.
    pub fn bar(&self) -> &StatusBar {
        &self.bar
    }
}

impl SettingsStore for DaemonState {
    fn debug_output(&self) -> bool {
        self.debug_output
    }

    fn set_debug_output(&mut self, enabled: bool) {
        self.debug_output = enabled;
    }

    fn text_font(&self) -> &str {
        &self.bar.config().text_font
    }

    fn set_text_font(&mut self, font: String) {
        self.bar.set_text_font(font);
    }

    fn icon_font(&self) -> &str {
        &self.bar.config().icon_font
    }

    fn set_icon_font(&mut self, font: String) {
        self.bar.set_icon_font(font);
    }

    fn background_color(&self) -> u32 {
        self.bar.config().background_color
    }

    fn set_background_color(&mut self, color: u32) {
        self.bar.set_background_color(color);
    }

    fn foreground_color(&self) -> u32 {
        self.bar.config().foreground_color
    }

    fn set_foreground_color(&mut self, color: u32) {
        self.bar.set_foreground_color(color);
    }

    fn space_icon_strip(&self) -> &[String] {
        &self.bar.config().space_icon_strip
    }

    fn set_space_icon_strip(&mut self, icons: Vec<String>) {
        self.bar.set_space_icon_strip(icons);
    }

    fn power_icon_strip(&self) -> &[String] {
        &self.bar.config().power_icon_strip
    }

    fn set_power_icon_strip(&mut self, icons: Vec<String>) -> usize {
        self.bar.set_power_icon_strip(icons)
    }

    fn space_icon(&self) -> Option<&str> {
        self.bar.config().space_icon.as_deref()
    }

    fn set_space_icon(&mut self, icon: String) {
        self.bar.set_space_icon(icon);
    }

    fn clock_icon(&self) -> Option<&str> {
        self.bar.config().clock_icon.as_deref()
    }

    fn set_clock_icon(&mut self, icon: String) {
        self.bar.set_clock_icon(icon);
    }
}
