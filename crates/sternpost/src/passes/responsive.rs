//! Responsive sizing of the root `svg`

use super::Pass;
use crate::core::{ColorMode, SvgElement};

/// Let the diagram shrink with its container instead of keeping the
/// renderer's fixed pixel width
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponsiveSizing;

impl ResponsiveSizing {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for ResponsiveSizing {
    fn name(&self) -> &'static str {
        "responsive-sizing"
    }

    fn applies(&self, root: &SvgElement, _mode: ColorMode) -> bool {
        root.is("svg")
    }

    fn apply(&self, root: &mut SvgElement, mode: ColorMode) -> usize {
        if !self.applies(root, mode) {
            return 0;
        }
        root.set_style_property("max-width", "100%");
        root.set_style_property("height", "auto");
        root.set_style_property("width", "auto");
        1
    }
}
