//! Post-processing passes over rendered diagrams
//!
//! Each pass is a bounded walk over the SVG tree that depends only on the
//! tree and the color mode it is handed. Passes run in registration order:
//!
//! 1. [`ResponsiveSizing`]: root sizing
//! 2. [`DecisionRescale`]: geometric decision-shape rescale
//! 3. [`TextColors`]: label colors
//! 4. [`PaletteOverrides`]: dark palette for sequence diagrams

pub mod decision;
pub mod palette;
pub mod report;
pub mod responsive;
pub mod text;

pub use decision::DecisionRescale;
pub use palette::PaletteOverrides;
pub use report::DiagramReport;
pub use responsive::ResponsiveSizing;
pub use text::TextColors;

use tracing::{span, trace, Level};

use crate::core::{ColorMode, SvgElement};

/// A post-processing pass
pub trait Pass {
    /// Stable name used in logs
    fn name(&self) -> &'static str;

    /// Whether the pass has anything to do for this tree and mode
    ///
    /// [`PassSet::run`] skips passes that return `false`. `apply` is still
    /// called directly for single passes, so it keeps its own guard.
    fn applies(&self, _root: &SvgElement, _mode: ColorMode) -> bool {
        true
    }

    /// Apply the pass, returning the number of elements touched
    fn apply(&self, root: &mut SvgElement, mode: ColorMode) -> usize;
}

/// Ordered collection of passes
pub struct PassSet {
    passes: Vec<Box<dyn Pass>>,
}

impl PassSet {
    /// An empty set
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// The four standard passes in their standard order
    pub fn standard() -> Self {
        let mut set = Self::new();
        set.register(Box::new(ResponsiveSizing));
        set.register(Box::new(DecisionRescale::new()));
        set.register(Box::new(TextColors));
        set.register(Box::new(PaletteOverrides));
        set
    }

    pub fn register(&mut self, pass: Box<dyn Pass>) {
        self.passes.push(pass);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Run every pass, returning the total number of elements touched
    pub fn run(&self, root: &mut SvgElement, mode: ColorMode) -> usize {
        let run_span = span!(Level::DEBUG, "run_passes", %mode, passes = self.passes.len());
        let _enter = run_span.enter();

        self.passes
            .iter()
            .map(|pass| {
                if !pass.applies(root, mode) {
                    trace!(pass = pass.name(), "Pass skipped");
                    return 0;
                }
                let touched = pass.apply(root, mode);
                trace!(pass = pass.name(), touched, "Pass finished");
                touched
            })
            .sum()
    }
}

impl Default for PassSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Run the standard passes on `root`
pub fn postprocess(root: &mut SvgElement, mode: ColorMode) -> usize {
    PassSet::standard().run(root, mode)
}
