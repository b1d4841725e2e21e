//! Decision-shape rescaling
//!
//! The renderer draws decision (diamond) nodes noticeably larger than the
//! surrounding content. Class names for those shapes differ between diagram
//! kinds, so the shape is recognized geometrically instead: a four-vertex
//! polygon in a node group whose bounding box is roughly square and whose
//! vertices sit on the box's edge midpoints.

use tracing::{debug, trace};

use super::Pass;
use crate::core::{parse_points, BoundingBox, ColorMode, DiagramError, Point, SvgElement};

/// Scale applied to accepted decision shapes
pub const DECISION_SCALE: f64 = 2.0 / 3.0;

/// Accepted bounding-box aspect ratio range (width / height), inclusive
pub const ASPECT_RANGE: (f64, f64) = (0.75, 1.25);

/// Vertex tolerance as a share of the larger bounding-box side
pub const TOLERANCE_RATIO: f64 = 0.06;

/// Lower bound on the vertex tolerance, in user units
pub const MIN_TOLERANCE: f64 = 2.0;

/// Attribute set on polygons that were already rescaled
pub const SCALED_MARKER: &str = "data-decision-scaled";

/// Why a polygon is not a decision shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Not exactly four vertices
    VertexCount,
    /// Zero width or height
    Degenerate,
    /// Aspect ratio outside [`ASPECT_RANGE`]
    Aspect,
    /// Some edge midpoint has no vertex near it
    Corners,
}

/// Per-polygon judgment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    Diamond(BoundingBox),
    Rejected(Rejection),
}

impl Classification {
    pub fn is_diamond(&self) -> bool {
        matches!(self, Classification::Diamond(_))
    }
}

/// Classify a polygon outline
pub fn classify(points: &[Point]) -> Classification {
    if points.len() != 4 {
        return Classification::Rejected(Rejection::VertexCount);
    }
    let Some(bbox) = BoundingBox::of(points) else {
        return Classification::Rejected(Rejection::VertexCount);
    };

    let (width, height) = (bbox.width(), bbox.height());
    if width <= 0.0 || height <= 0.0 {
        return Classification::Rejected(Rejection::Degenerate);
    }

    let aspect = width / height;
    if aspect < ASPECT_RANGE.0 || aspect > ASPECT_RANGE.1 {
        return Classification::Rejected(Rejection::Aspect);
    }

    let tolerance = MIN_TOLERANCE.max(TOLERANCE_RATIO * width.max(height));
    let all_near = bbox
        .edge_midpoints()
        .iter()
        .all(|target| points.iter().any(|p| p.distance(target) <= tolerance));
    if !all_near {
        return Classification::Rejected(Rejection::Corners);
    }

    Classification::Diamond(bbox)
}

/// Classify a raw `points` attribute value
pub fn classify_points(points: &str) -> Result<Classification, DiagramError> {
    Ok(classify(&parse_points(points)?))
}

/// Compose a scale around `center` after an existing transform
///
/// The existing transform is kept in front so it still applies last.
pub fn compose_scale(existing: Option<&str>, center: Point, factor: f64) -> String {
    let scale = format!(
        "translate({} {}) scale({}) translate({} {})",
        num(center.x),
        num(center.y),
        factor,
        num(-center.x),
        num(-center.y)
    );
    match existing.map(str::trim).filter(|t| !t.is_empty()) {
        Some(prior) => format!("{} {}", prior, scale),
        None => scale,
    }
}

fn num(value: f64) -> f64 {
    // avoid printing "-0"
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Rescale decision shapes that are direct children of node groups
#[derive(Debug, Clone, Copy)]
pub struct DecisionRescale {
    scale: f64,
}

impl DecisionRescale {
    pub fn new() -> Self {
        Self {
            scale: DECISION_SCALE,
        }
    }

    pub fn with_scale(scale: f64) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for DecisionRescale {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for DecisionRescale {
    fn name(&self) -> &'static str {
        "decision-rescale"
    }

    fn apply(&self, root: &mut SvgElement, _mode: ColorMode) -> usize {
        let mut scaled = 0;
        root.walk_mut(&mut |ancestors, element| {
            if !element.is("polygon") || element.attr(SCALED_MARKER).is_some() {
                return;
            }
            let in_node_group = ancestors
                .last()
                .is_some_and(|parent| parent.is("g") && parent.has_class("node"));
            if !in_node_group {
                return;
            }

            let Some(raw) = element.attr("points") else {
                return;
            };
            let classification = match classify_points(raw) {
                Ok(classification) => classification,
                Err(e) => {
                    trace!(error = %e, "Skipping polygon with unreadable points");
                    return;
                }
            };

            match classification {
                Classification::Diamond(bbox) => {
                    let transform =
                        compose_scale(element.attr("transform"), bbox.center(), self.scale);
                    element.set_attr("transform", transform);
                    element.set_attr(SCALED_MARKER, "true");
                    scaled += 1;
                }
                Classification::Rejected(reason) => {
                    trace!(?reason, "Polygon is not a decision shape");
                }
            }
        });
        debug!(scaled, "Decision shapes rescaled");
        scaled
    }
}
