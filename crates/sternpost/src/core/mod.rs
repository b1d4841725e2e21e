//! Core building blocks for diagram post-processing
//!
//! Errors, logging, shared types, the owned SVG tree, inline styles, polygon
//! geometry, configuration and the collaborator traits.

mod config;
mod error;
mod geometry;
pub mod logging;
mod renderer;
mod style;
mod tree;
mod types;

pub use config::*;
pub use error::*;
pub use geometry::*;
pub use logging::*;
pub use renderer::*;
pub use style::*;
pub use tree::*;
pub use types::*;
