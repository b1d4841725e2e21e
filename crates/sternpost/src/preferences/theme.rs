//! Theme selection and persistence
//!
//! An explicit choice in the store wins over the system preference. System
//! changes are followed only while no explicit choice is stored.

use tracing::{debug, info};

use super::store::{PreferenceStore, THEME_KEY};
use crate::core::{ColorMode, DiagramError, ThemeState};

/// Meta `theme-color` value for dark pages
pub const DARK_THEME_COLOR: &str = "#0f172a";

/// Meta `theme-color` value for light pages
pub const LIGHT_THEME_COLOR: &str = "#ffffff";

/// Owns the color mode shared with the diagram processor
pub struct ThemeController<S> {
    store: S,
    state: ThemeState,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Resolve the initial mode from the store, falling back to the system
    pub fn new(store: S, system_prefers_dark: bool) -> Self {
        let mode = stored_mode(&store).unwrap_or(ColorMode::from_system(system_prefers_dark));
        debug!(%mode, "Resolved initial theme");
        Self {
            store,
            state: ThemeState::new(mode),
        }
    }

    /// Handle to the shared mode, for the processor
    pub fn state(&self) -> ThemeState {
        self.state.clone()
    }

    pub fn mode(&self) -> ColorMode {
        self.state.mode()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// True when the user picked a theme explicitly
    pub fn has_explicit_choice(&self) -> bool {
        stored_mode(&self.store).is_some()
    }

    /// Flip the mode and persist the choice; callers re-render diagrams
    pub fn toggle(&mut self) -> Result<ColorMode, DiagramError> {
        let mode = self.mode().toggled();
        self.set(mode)?;
        Ok(mode)
    }

    /// Apply and persist an explicit choice
    pub fn set(&mut self, mode: ColorMode) -> Result<(), DiagramError> {
        self.state.set(mode);
        self.store.set(THEME_KEY, mode.as_str())?;
        info!(%mode, "Theme changed");
        Ok(())
    }

    /// Forget the explicit choice and go back to following the system
    pub fn clear(&mut self, system_prefers_dark: bool) -> Result<ColorMode, DiagramError> {
        self.store.remove(THEME_KEY)?;
        let mode = ColorMode::from_system(system_prefers_dark);
        self.state.set(mode);
        Ok(mode)
    }

    /// React to a system preference change
    ///
    /// Returns the new mode when it was applied; `None` when an explicit
    /// choice is stored or the mode did not change.
    pub fn system_changed(&mut self, prefers_dark: bool) -> Option<ColorMode> {
        if self.has_explicit_choice() {
            return None;
        }
        let mode = ColorMode::from_system(prefers_dark);
        if mode == self.mode() {
            return None;
        }
        self.state.set(mode);
        info!(%mode, "Following system theme");
        Some(mode)
    }

    pub fn meta_theme_color(&self) -> &'static str {
        meta_theme_color(self.mode())
    }

    pub fn toggle_icon(&self) -> &'static str {
        toggle_icon(self.mode())
    }

    pub fn toggle_label(&self) -> String {
        toggle_label(self.mode())
    }
}

fn stored_mode(store: &impl PreferenceStore) -> Option<ColorMode> {
    store.get(THEME_KEY).and_then(|value| value.parse().ok())
}

pub fn meta_theme_color(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Dark => DARK_THEME_COLOR,
        ColorMode::Light => LIGHT_THEME_COLOR,
    }
}

/// Icon of the toggle button: the mode a click switches to
pub fn toggle_icon(mode: ColorMode) -> &'static str {
    match mode {
        ColorMode::Dark => "☀️",
        ColorMode::Light => "🌙",
    }
}

pub fn toggle_label(mode: ColorMode) -> String {
    format!("Switch to {} theme", mode.toggled())
}
