//! Diagram containers and the page that holds them
//!
//! A container starts out holding diagram description text. Rendering
//! swaps the text for an SVG tree (or an error display) and remembers the
//! original text so a reset can bring it back.

use crate::core::SvgElement;

/// Current layout of a container, re-read before every render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    /// Some ancestor is hidden (`display: none`, collapsed tab, ...)
    pub hidden_ancestor: bool,
}

impl Layout {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            hidden_ancestor: false,
        }
    }

    /// Layout of a container inside a hidden ancestor
    pub fn hidden() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            hidden_ancestor: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden_ancestor && self.width > 0.0 && self.height > 0.0
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// What a container currently holds
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Diagram description text
    Source(String),
    /// Rendered and post-processed visual markup
    Visual(SvgElement),
    /// Error display markup (HTML)
    Error(String),
}

/// Per-container render lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Unrendered,
    Rendering,
    Rendered,
    Errored,
}

/// A diagram container
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    id: Option<String>,
    content: Content,
    original: Option<String>,
    processed: bool,
    state: RenderState,
    layout: Layout,
}

impl Container {
    /// A visible container holding `text`
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: None,
            content: Content::Source(text.into()),
            original: None,
            processed: false,
            state: RenderState::Unrendered,
            layout: Layout::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into()).filter(|id: &String| !id.is_empty());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Original description text, stored on first render
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// The "rendered" marker
    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }

    /// Description text while the container holds source
    pub fn source_text(&self) -> Option<&str> {
        match &self.content {
            Content::Source(text) => Some(text),
            _ => None,
        }
    }

    /// True when the container already holds visual markup
    ///
    /// Source text that is itself SVG markup counts as visual.
    pub fn holds_visual(&self) -> bool {
        match &self.content {
            Content::Visual(_) => true,
            Content::Source(text) => text.contains("<svg"),
            Content::Error(_) => false,
        }
    }

    pub fn visual(&self) -> Option<&SvgElement> {
        match &self.content {
            Content::Visual(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn visual_mut(&mut self) -> Option<&mut SvgElement> {
        match &mut self.content {
            Content::Visual(tree) => Some(tree),
            _ => None,
        }
    }

    /// Serialized content as it would appear in the page
    pub fn markup(&self) -> String {
        match &self.content {
            Content::Source(text) => text.clone(),
            Content::Visual(tree) => tree.to_markup(),
            Content::Error(html) => html.clone(),
        }
    }

    pub(crate) fn remember_original(&mut self, text: &str) {
        if self.original.is_none() {
            self.original = Some(text.to_string());
        }
    }

    pub(crate) fn mark_rendering(&mut self) {
        self.state = RenderState::Rendering;
    }

    pub(crate) fn set_rendered(&mut self, tree: SvgElement) {
        self.content = Content::Visual(tree);
        self.processed = true;
        self.state = RenderState::Rendered;
    }

    pub(crate) fn set_errored(&mut self, html: String) {
        self.content = Content::Error(html);
        self.state = RenderState::Errored;
    }

    /// Restore the original text and clear the rendered marker
    ///
    /// Returns false (and changes nothing) when no original was stored.
    pub fn reset(&mut self) -> bool {
        let Some(original) = self.original.clone() else {
            return false;
        };
        self.content = Content::Source(original);
        self.processed = false;
        self.state = RenderState::Unrendered;
        true
    }
}

/// Diagram containers in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    containers: Vec<Container>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, container: Container) {
        self.containers.push(container);
    }

    pub fn len(&self) -> usize {
        self.containers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Container> {
        self.containers.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Container> {
        self.containers.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Container> {
        self.containers.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Container> {
        self.containers.iter_mut()
    }
}

impl FromIterator<Container> for Page {
    fn from_iter<I: IntoIterator<Item = Container>>(iter: I) -> Self {
        Self {
            containers: iter.into_iter().collect(),
        }
    }
}
