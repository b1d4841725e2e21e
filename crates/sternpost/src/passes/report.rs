//! Read-only summary of a rendered diagram
//!
//! Reports what the passes would find without changing the tree.

use serde::Serialize;

use super::decision::{classify_points, SCALED_MARKER};
use super::palette::{is_sequence_diagram, CUTOUT_MARKER};
use crate::core::SvgElement;

/// Marker and shape counts for one diagram
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagramReport {
    /// The tree carries message-sequence markers
    pub sequence: bool,
    /// Participant boxes (`rect.actor`)
    pub participants: usize,
    /// Cutouts already inserted
    pub cutouts: usize,
    /// Polygons directly inside node groups
    pub candidates: usize,
    /// Candidates that classify as decision shapes
    pub decisions: usize,
    /// Polygons already carrying the rescale marker
    pub rescaled: usize,
    /// `text` and `tspan` elements
    pub labels: usize,
}

impl DiagramReport {
    pub fn of(root: &SvgElement) -> Self {
        let mut report = Self {
            sequence: is_sequence_diagram(root),
            ..Self::default()
        };

        root.walk(&mut |ancestors, element| {
            if element.is("rect") && element.has_class("actor") {
                report.participants += 1;
            }
            if element.attr(CUTOUT_MARKER).is_some() {
                report.cutouts += 1;
            }
            if element.is("text") || element.is("tspan") {
                report.labels += 1;
            }
            if !element.is("polygon") {
                return;
            }
            if element.attr(SCALED_MARKER).is_some() {
                report.rescaled += 1;
            }
            let in_node_group = ancestors
                .last()
                .is_some_and(|parent| parent.is("g") && parent.has_class("node"));
            if in_node_group {
                report.candidates += 1;
                let is_diamond = element
                    .attr("points")
                    .and_then(|raw| classify_points(raw).ok())
                    .is_some_and(|c| c.is_diamond());
                if is_diamond {
                    report.decisions += 1;
                }
            }
        });
        report
    }
}
