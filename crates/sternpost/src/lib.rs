//! Sternpost - Post-processing for Mermaid.js diagrams on documentation sites
//!
//! Renders each diagram container once through a rendering collaborator,
//! then fixes up the SVG the renderer produced: responsive sizing, smaller
//! decision shapes, readable label colors and a dark palette for sequence
//! diagrams.
//!
//! # Quick Start
//!
//! ```rust
//! use sternpost::{postprocess_svg, ColorMode};
//!
//! let svg = r#"<svg><g class="node"><polygon points="40,0 80,40 40,80 0,40"/></g></svg>"#;
//! let processed = postprocess_svg(svg, ColorMode::Light).unwrap();
//! assert!(processed.contains("scale(0.6666"));
//! assert!(processed.contains("max-width: 100%"));
//! ```
//!
//! # Driving a page
//!
//! ```rust
//! use std::future::Future;
//! use sternpost::prelude::*;
//!
//! struct Fixed;
//!
//! impl DiagramRenderer for Fixed {
//!     fn initialize(&mut self, _config: &RendererConfig) -> Result<(), RenderError> {
//!         Ok(())
//!     }
//!
//!     fn render(&self, _id: &str, _text: &str) -> impl Future<Output = Result<String, RenderError>> {
//!         async { Ok("<svg><text>A</text></svg>".to_string()) }
//!     }
//! }
//!
//! let mut page: Page = [Container::new("flowchart TD\n  A-->B")].into_iter().collect();
//! let mut processor = Processor::new(Fixed, NoDelay, ThemeState::new(ColorMode::Dark));
//! let summary = futures::executor::block_on(processor.start(&mut page)).unwrap();
//! assert_eq!(summary.rendered, 1);
//! assert!(page.get(0).unwrap().is_processed());
//! ```

pub mod core;
pub mod passes;
pub mod pipeline;
pub mod preferences;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        ColorMode, DiagramError, DiagramKind, DiagramRenderer, NoDelay, ProcessorConfig,
        RenderError, RendererConfig, SvgElement, ThemeState, ThreadTimer, Timer,
    };
    pub use crate::passes::{DiagramReport, Pass, PassSet};
    pub use crate::pipeline::{Container, Layout, Page, Processor, RenderOutcome, RenderSummary};
    pub use crate::preferences::{MemoryStore, NavState, PreferenceStore, ThemeController};
}

/// Run the standard passes over SVG markup
///
/// # Arguments
/// * `markup` - SVG markup as produced by the renderer
/// * `mode` - Color mode the passes style for
///
/// # Returns
/// * `Ok(String)` - The processed markup
/// * `Err` - If the markup is not well-formed
pub fn postprocess_svg(markup: &str, mode: ColorMode) -> anyhow::Result<String> {
    let mut root = SvgElement::parse(markup)?;
    passes::postprocess(&mut root, mode);
    Ok(root.to_markup())
}

/// Summarize the markers and decision shapes in SVG markup
///
/// # Example
/// ```rust
/// use sternpost::inspect_svg;
///
/// let report = inspect_svg(r#"<svg aria-roledescription="sequence"/>"#).unwrap();
/// assert!(report.sequence);
/// ```
pub fn inspect_svg(markup: &str) -> anyhow::Result<passes::DiagramReport> {
    let root = SvgElement::parse(markup)?;
    Ok(passes::DiagramReport::of(&root))
}

/// Renderer configuration for `mode` as pretty-printed JSON
pub fn renderer_config_json(mode: ColorMode) -> anyhow::Result<String> {
    Ok(RendererConfig::for_mode(mode).to_json_pretty()?)
}
