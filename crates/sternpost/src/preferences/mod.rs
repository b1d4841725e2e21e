//! Reader preferences: theme, navigation and viewport
//!
//! The [`ThemeController`] owns the [`ThemeState`](crate::core::ThemeState)
//! that the diagram processor reads, so a toggle here is picked up by the
//! next render or palette pass.

mod nav;
mod store;
mod theme;
mod viewport;

pub use nav::NavState;
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
pub use store::{MemoryStore, PreferenceStore, NAV_COLLAPSED_KEY, THEME_KEY};
pub use theme::{
    meta_theme_color, toggle_icon, toggle_label, ThemeController, DARK_THEME_COLOR,
    LIGHT_THEME_COLOR,
};
pub use viewport::{back_to_top_visible, is_mobile, Viewport, BACK_TO_TOP_OFFSET, MOBILE_BREAKPOINT};
