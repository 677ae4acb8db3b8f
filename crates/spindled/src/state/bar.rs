//! Status bar settings and the render seam.
//!
//! [`StatusBar`] owns the bar configuration. Every setter stores the new value
//! and then runs one update-then-flush cycle on its [`BarRenderer`], so a
//! renderer never observes a half-applied change.

use tracing::debug;

/// Tracing target for bar state changes.
pub(crate) const BAR_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::bar");

/// Default font used for bar text.
pub const DEFAULT_TEXT_FONT: &str = "Helvetica Neue:Bold:12.0";
/// Default font used for bar icons.
pub const DEFAULT_ICON_FONT: &str = "Font Awesome 5 Free:Solid:12.0";
/// Default ARGB background colour.
pub const DEFAULT_BACKGROUND_COLOR: u32 = 0xff20_2020;
/// Default ARGB foreground colour.
pub const DEFAULT_FOREGROUND_COLOR: u32 = 0xffa8_a8a8;

/// Snapshot of everything the renderer needs to draw the bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarConfig {
    pub text_font: String,
    pub icon_font: String,
    pub background_color: u32,
    pub foreground_color: u32,
    pub space_icon_strip: Vec<String>,
    pub power_icon_strip: Vec<String>,
    pub space_icon: Option<String>,
    pub clock_icon: Option<String>,
}

impl Default for BarConfig {
    fn default() -> Self {
        Self {
            text_font: DEFAULT_TEXT_FONT.to_owned(),
            icon_font: DEFAULT_ICON_FONT.to_owned(),
            background_color: DEFAULT_BACKGROUND_COLOR,
            foreground_color: DEFAULT_FOREGROUND_COLOR,
            space_icon_strip: Vec::new(),
            power_icon_strip: Vec::new(),
            space_icon: None,
            clock_icon: None,
        }
    }
}

/// Recomputes and presents bar visuals after a configuration change.
#[cfg_attr(test, mockall::automock)]
pub trait BarRenderer: Send {
    /// Recomputes layout and cached resources from the configuration.
    fn update(&mut self, config: &BarConfig);

    /// Presents the recomputed bar.
    fn flush(&mut self);
}

/// Renderer that only records refreshes in the trace log.
#[derive(Debug, Default)]
pub struct TracingRenderer {
    generation: u64,
}

impl TracingRenderer {
    /// Number of completed update-then-flush cycles.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl BarRenderer for TracingRenderer {
    fn update(&mut self, config: &BarConfig) {
        debug!(
            target: BAR_TARGET,
            text_font = %config.text_font,
            icon_font = %config.icon_font,
            background = format_args!("{:#x}", config.background_color),
            foreground = format_args!("{:#x}", config.foreground_color),
            space_icons = config.space_icon_strip.len(),
            power_icons = config.power_icon_strip.len(),
            "bar layout updated"
        );
    }

    fn flush(&mut self) {
        self.generation += 1;
        debug!(target: BAR_TARGET, generation = self.generation, "bar flushed");
    }
}

/// Bar state owner.
pub struct StatusBar {
    config: BarConfig,
    renderer: Box<dyn BarRenderer>,
}

impl std::fmt::Debug for StatusBar {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("StatusBar")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new(Box::new(TracingRenderer::default()))
    }
}

impl StatusBar {
    /// Creates a bar with default settings drawn by `renderer`.
    pub fn new(renderer: Box<dyn BarRenderer>) -> Self {
        Self::with_config(BarConfig::default(), renderer)
    }

    /// Creates a bar with explicit settings.
    pub fn with_config(config: BarConfig, renderer: Box<dyn BarRenderer>) -> Self {
        Self { config, renderer }
    }

    /// Current configuration.
    pub fn config(&self) -> &BarConfig {
        &self.config
    }

    /// Replaces the font used for bar text.
    pub fn set_text_font(&mut self, font: String) {
        self.apply(|config| config.text_font = font);
    }

    /// Replaces the font used for bar icons.
    pub fn set_icon_font(&mut self, font: String) {
        self.apply(|config| config.icon_font = font);
    }

    /// Sets the ARGB background colour.
    pub fn set_background_color(&mut self, color: u32) {
        self.apply(|config| config.background_color = color);
    }

    /// Sets the ARGB foreground colour.
    pub fn set_foreground_color(&mut self, color: u32) {
        self.apply(|config| config.foreground_color = color);
    }

    /// Replaces the per-space icon list, keeping order and duplicates.
    pub fn set_space_icon_strip(&mut self, icons: Vec<String>) {
        self.apply(|config| config.space_icon_strip = icons);
    }

    /// Replaces the power icon strip and returns the stored length.
    pub fn set_power_icon_strip(&mut self, icons: Vec<String>) -> usize {
        self.apply(|config| config.power_icon_strip = icons);
        self.config.power_icon_strip.len()
    }

    /// Sets the glyph drawn for the active space.
    pub fn set_space_icon(&mut self, icon: String) {
        self.apply(|config| config.space_icon = Some(icon));
    }

    /// Sets the glyph drawn before the clock.
    pub fn set_clock_icon(&mut self, icon: String) {
        self.apply(|config| config.clock_icon = Some(icon));
    }

    fn apply(&mut self, change: impl FnOnce(&mut BarConfig)) {
        change(&mut self.config);
        self.renderer.update(&self.config);
        self.renderer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;

    fn expect_refresh(renderer: &mut MockBarRenderer, times: usize) {
        let mut sequence = Sequence::new();
        for _ in 0..times {
            renderer
                .expect_update()
                .times(1)
                .in_sequence(&mut sequence)
                .return_const(());
            renderer
                .expect_flush()
                .times(1)
                .in_sequence(&mut sequence)
                .return_const(());
        }
    }

    #[test]
    fn every_setter_updates_then_flushes() {
        let mut renderer = MockBarRenderer::new();
        expect_refresh(&mut renderer, 8);
        let mut bar = StatusBar::new(Box::new(renderer));

        bar.set_text_font("Iosevka:Regular:13.0".to_owned());
        bar.set_icon_font("Symbols Nerd Font:Regular:13.0".to_owned());
        bar.set_background_color(0xff00_0000);
        bar.set_foreground_color(0xffff_ffff);
        bar.set_space_icon_strip(vec!["I".to_owned(), "II".to_owned()]);
        bar.set_power_icon_strip(vec!["on".to_owned(), "off".to_owned()]);
        bar.set_space_icon("*".to_owned());
        bar.set_clock_icon("@".to_owned());

        assert_eq!(bar.config().text_font, "Iosevka:Regular:13.0");
        assert_eq!(bar.config().clock_icon.as_deref(), Some("@"));
    }

    #[test]
    fn renderer_sees_the_new_value() {
        let mut renderer = MockBarRenderer::new();
        renderer
            .expect_update()
            .withf(|config| config.background_color == 0xff11_2233)
            .times(1)
            .return_const(());
        renderer.expect_flush().times(1).return_const(());
        let mut bar = StatusBar::new(Box::new(renderer));

        bar.set_background_color(0xff11_2233);
    }

    #[test]
    fn power_strip_reports_stored_length() {
        let mut bar = StatusBar::default();
        assert_eq!(bar.set_power_icon_strip(vec!["a".to_owned()]), 1);
        assert_eq!(bar.config().power_icon_strip, ["a"]);
    }

    #[test]
    fn tracing_renderer_counts_cycles() {
        let mut renderer = TracingRenderer::default();
        renderer.update(&BarConfig::default());
        renderer.flush();
        renderer.flush();
        assert_eq!(renderer.generation(), 2);
    }
}
