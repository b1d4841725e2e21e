//! Navigation sidebar state

use super::store::{PreferenceStore, NAV_COLLAPSED_KEY};
use crate::core::DiagramError;

/// Collapsed flag of the sidebar, persisted across page loads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NavState {
    pub collapsed: bool,
}

impl NavState {
    /// Only the exact string "true" counts as collapsed
    pub fn load(store: &impl PreferenceStore) -> Self {
        Self {
            collapsed: store.get(NAV_COLLAPSED_KEY).as_deref() == Some("true"),
        }
    }

    pub fn save(&self, store: &mut impl PreferenceStore) -> Result<(), DiagramError> {
        store.set(NAV_COLLAPSED_KEY, if self.collapsed { "true" } else { "false" })
    }

    /// Flip and persist, returning the new flag
    pub fn toggle(&mut self, store: &mut impl PreferenceStore) -> Result<bool, DiagramError> {
        self.collapsed = !self.collapsed;
        self.save(store)?;
        Ok(self.collapsed)
    }
}
