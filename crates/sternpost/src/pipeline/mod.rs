//! Container lifecycle and the render driver
//!
//! A [`Page`] holds diagram [`Container`]s in document order. The
//! [`Processor`] renders each container through the collaborator exactly
//! once, runs the post-render passes, and replaces failures with an
//! [`error_display`]. Theme changes and recovery go through
//! [`Processor::reinitialize`].

mod container;
mod display;
mod ids;
mod processor;
mod recovery;

pub use container::{Container, Content, Layout, Page, RenderState};
pub use display::{error_display, ERROR_HEADING, ERROR_HINT};
pub use ids::IdGenerator;
pub use processor::{Processor, RenderOutcome, RenderSummary, SkipReason};
pub use recovery::{mentions_diagram_subsystem, DIAGRAM_SUBSYSTEM};
