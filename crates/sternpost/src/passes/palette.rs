//! Dark-mode palette overrides for message sequence diagrams
//!
//! The renderer's dark theme leaves sequence diagrams hard to read: boxes
//! keep light fills, call and return lines look alike, and lifelines show
//! through transparent participant boxes. This pass force-sets inline
//! styles per structural role from a fixed table and slides a background
//! "cutout" behind every participant box.
//!
//! Flowcharts, class and entity diagrams are left alone; their colors come
//! from the renderer configuration.

use tracing::debug;

use super::Pass;
use crate::core::{Ancestor, ColorMode, SvgElement, SvgNode};

/// Attribute marking inserted cutout rectangles
pub const CUTOUT_MARKER: &str = "data-cutout";

/// Class given to inserted cutout rectangles
pub const CUTOUT_CLASS: &str = "actor-cutout";

/// Classes that only occur in message sequence diagrams
pub const SEQUENCE_MARKERS: &[&str] = &[
    "actor",
    "actor-line",
    "messageLine0",
    "messageLine1",
    "messageText",
];

const LABEL_CLASSES: &[&str] = &[
    "messageText",
    "actor",
    "noteText",
    "labelText",
    "loopText",
    "sequenceNumber",
];

/// Structural role of an element inside a sequence diagram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceRole {
    /// Participant (actor) box
    ParticipantBox,
    /// Note background
    NoteBox,
    /// Loop/alt label background
    LabelBox,
    /// Vertical participant lifeline
    Lifeline,
    /// Loop/alt frame line
    LoopLine,
    /// Synchronous call message
    CallLine,
    /// Return (reply) message
    ReturnLine,
    /// Any text label
    Label,
    /// Arrowhead marker shape
    Arrowhead,
}

impl SequenceRole {
    /// Role of `element` given its ancestors, if it has one
    pub fn classify(ancestors: &[Ancestor], element: &SvgElement) -> Option<Self> {
        if ancestors.iter().any(|a| a.is("marker")) {
            return matches!(element.local_name(), "path" | "circle" | "polygon")
                .then_some(SequenceRole::Arrowhead);
        }

        match element.local_name() {
            "rect" if element.has_class("actor") => Some(SequenceRole::ParticipantBox),
            "rect" if element.has_class("note") => Some(SequenceRole::NoteBox),
            "rect" | "polygon" if element.has_class("labelBox") => Some(SequenceRole::LabelBox),
            "line" if element.has_class("actor-line") => Some(SequenceRole::Lifeline),
            "line" if element.has_class("loopLine") => Some(SequenceRole::LoopLine),
            "line" | "path" if element.has_class("messageLine0") => Some(SequenceRole::CallLine),
            "line" | "path" if element.has_class("messageLine1") => {
                Some(SequenceRole::ReturnLine)
            }
            "text" if has_label_class(element.classes()) => Some(SequenceRole::Label),
            "tspan"
                if has_label_class(element.classes())
                    || ancestors.iter().any(|a| {
                        a.is("text")
                            && a.class
                                .as_deref()
                                .is_some_and(|c| has_label_class(c.split_whitespace()))
                    }) =>
            {
                Some(SequenceRole::Label)
            }
            _ => None,
        }
    }
}

fn has_label_class<'a>(mut classes: impl Iterator<Item = &'a str>) -> bool {
    classes.any(|c| LABEL_CLASSES.contains(&c))
}

/// Fixed style table: the properties forced onto an element of `role`
pub fn overrides(mode: ColorMode, role: SequenceRole) -> Vec<(&'static str, &'static str)> {
    let p = mode.palette();
    match role {
        SequenceRole::ParticipantBox => vec![
            ("fill", p.secondary),
            ("stroke", p.primary),
            ("stroke-width", "1.5px"),
        ],
        SequenceRole::NoteBox => vec![
            ("fill", p.tertiary),
            ("stroke", p.line),
            ("stroke-width", "1px"),
        ],
        SequenceRole::LabelBox => vec![("fill", p.secondary), ("stroke", p.primary)],
        SequenceRole::Lifeline => vec![("stroke", p.line), ("stroke-width", "1px")],
        SequenceRole::LoopLine => vec![
            ("stroke", p.line),
            ("stroke-width", "1px"),
            ("stroke-dasharray", "2,2"),
        ],
        SequenceRole::CallLine => vec![
            ("stroke", p.line_strong),
            ("stroke-width", "2px"),
            ("stroke-dasharray", "none"),
        ],
        SequenceRole::ReturnLine => vec![
            ("stroke", p.line),
            ("stroke-width", "1.5px"),
            ("stroke-dasharray", "6,4"),
        ],
        SequenceRole::Label => vec![("fill", p.text), ("stroke", "none")],
        SequenceRole::Arrowhead => vec![("fill", p.line_strong), ("stroke", p.line_strong)],
    }
}

/// True when the tree carries any message-sequence marker
pub fn is_sequence_diagram(root: &SvgElement) -> bool {
    root.attr("aria-roledescription") == Some("sequence")
        || root.any(|el| SEQUENCE_MARKERS.iter().any(|marker| el.has_class(marker)))
}

/// True when a cutout was inserted anywhere in the tree
pub fn has_cutout(root: &SvgElement) -> bool {
    root.any(|el| el.attr(CUTOUT_MARKER).is_some())
}

/// Insert a cutout before every participant box, returning how many
fn insert_cutouts(parent: &mut SvgElement, fill: &str) -> usize {
    let mut inserted = 0;
    let mut index = 0;
    while index < parent.children.len() {
        let cutout = match &parent.children[index] {
            SvgNode::Element(child) if child.is("rect") && child.has_class("actor") => {
                Some(cutout_for(child, fill))
            }
            _ => None,
        };

        if let Some(cutout) = cutout {
            parent.children.insert(index, SvgNode::Element(cutout));
            inserted += 1;
            index += 2;
            continue;
        }

        if let SvgNode::Element(child) = &mut parent.children[index] {
            inserted += insert_cutouts(child, fill);
        }
        index += 1;
    }
    inserted
}

fn cutout_for(participant: &SvgElement, fill: &str) -> SvgElement {
    let mut cutout = SvgElement::new(participant.name.clone())
        .with_attr("class", CUTOUT_CLASS)
        .with_attr(CUTOUT_MARKER, "true");
    for geometry in ["x", "y", "width", "height", "rx", "ry", "transform"] {
        if let Some(value) = participant.attr(geometry) {
            cutout.set_attr(geometry, value);
        }
    }
    cutout.set_style_property("fill", fill);
    cutout.set_style_property("stroke", "none");
    cutout
}

/// Dark palette pass for sequence diagrams
#[derive(Debug, Clone, Copy, Default)]
pub struct PaletteOverrides;

impl PaletteOverrides {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for PaletteOverrides {
    fn name(&self) -> &'static str {
        "palette-overrides"
    }

    fn applies(&self, root: &SvgElement, mode: ColorMode) -> bool {
        mode.is_dark() && is_sequence_diagram(root)
    }

    fn apply(&self, root: &mut SvgElement, mode: ColorMode) -> usize {
        if !self.applies(root, mode) {
            return 0;
        }

        let mut styled = 0;
        root.walk_mut(&mut |ancestors, element| {
            if let Some(role) = SequenceRole::classify(ancestors, element) {
                for (property, value) in overrides(mode, role) {
                    element.set_style_property(property, value);
                }
                styled += 1;
            }
        });

        // Whole-tree guard: boxes added after the first pass get no cutout.
        let cutouts = if has_cutout(root) {
            0
        } else {
            insert_cutouts(root, mode.palette().background)
        };

        debug!(styled, cutouts, "Palette overrides applied");
        styled + cutouts
    }
}
