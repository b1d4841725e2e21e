//! Owned SVG element tree
//!
//! The rendering collaborator hands back SVG markup as a string. Passes need
//! to mutate it in place, so the markup is parsed with `roxmltree` into an
//! owned tree that keeps attribute order, namespace declarations and text
//! nodes, and is serialized back after the passes ran.

use std::fmt;

use crate::core::{DiagramError, StyleDeclarations};

/// A child of an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SvgNode {
    Element(SvgElement),
    Text(String),
}

/// An element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SvgElement {
    pub name: String,
    attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
}

/// Summary of an ancestor handed to tree visitors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ancestor {
    pub name: String,
    pub class: Option<String>,
}

impl Ancestor {
    fn of(element: &SvgElement) -> Self {
        Self {
            name: element.name.clone(),
            class: element.attr("class").map(str::to_string),
        }
    }

    /// Compare the tag name without a namespace prefix
    pub fn is(&self, local_name: &str) -> bool {
        self.name.rsplit(':').next() == Some(local_name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.class
            .as_deref()
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

impl SvgElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: SvgElement) -> Self {
        self.children.push(SvgNode::Element(child));
        self
    }

    /// Builder-style text append
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(SvgNode::Text(text.into()));
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Set an attribute, replacing an existing value in place
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Tag name without a namespace prefix
    pub fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    pub fn is(&self, local_name: &str) -> bool {
        self.local_name() == local_name
    }

    pub fn element_children(&self) -> impl Iterator<Item = &SvgElement> {
        self.children.iter().filter_map(|child| match child {
            SvgNode::Element(element) => Some(element),
            SvgNode::Text(_) => None,
        })
    }

    pub fn element_children_mut(&mut self) -> impl Iterator<Item = &mut SvgElement> {
        self.children.iter_mut().filter_map(|child| match child {
            SvgNode::Element(element) => Some(element),
            SvgNode::Text(_) => None,
        })
    }

    /// Concatenated text of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                SvgNode::Text(text) => out.push_str(text),
                SvgNode::Element(element) => element.collect_text(out),
            }
        }
    }

    /// Parsed inline `style` attribute
    pub fn style(&self) -> StyleDeclarations {
        StyleDeclarations::parse(self.attr("style").unwrap_or(""))
    }

    pub fn style_property(&self, property: &str) -> Option<String> {
        self.style().get(property).map(str::to_string)
    }

    /// Force-set one inline style property, keeping the others
    pub fn set_style_property(&mut self, property: &str, value: &str) {
        let mut style = self.style();
        style.set(property, value);
        self.set_attr("style", style.to_string());
    }

    /// Visit this element and every descendant element, depth first
    ///
    /// The visitor receives the chain of ancestors from the root down to the
    /// visited element's parent.
    pub fn walk<F>(&self, f: &mut F)
    where
        F: FnMut(&[Ancestor], &SvgElement),
    {
        let mut path = Vec::new();
        self.walk_inner(&mut path, f);
    }

    fn walk_inner<F>(&self, path: &mut Vec<Ancestor>, f: &mut F)
    where
        F: FnMut(&[Ancestor], &SvgElement),
    {
        f(path.as_slice(), self);
        path.push(Ancestor::of(self));
        for child in self.element_children() {
            child.walk_inner(path, f);
        }
        path.pop();
    }

    /// Mutable variant of [`SvgElement::walk`]
    pub fn walk_mut<F>(&mut self, f: &mut F)
    where
        F: FnMut(&[Ancestor], &mut SvgElement),
    {
        let mut path = Vec::new();
        self.walk_mut_inner(&mut path, f);
    }

    fn walk_mut_inner<F>(&mut self, path: &mut Vec<Ancestor>, f: &mut F)
    where
        F: FnMut(&[Ancestor], &mut SvgElement),
    {
        f(path.as_slice(), self);
        path.push(Ancestor::of(self));
        for child in self.element_children_mut() {
            child.walk_mut_inner(path, f);
        }
        path.pop();
    }

    /// True when this element or any descendant matches
    pub fn any<P>(&self, mut predicate: P) -> bool
    where
        P: FnMut(&SvgElement) -> bool,
    {
        let mut found = false;
        self.walk(&mut |_, element| {
            if !found && predicate(element) {
                found = true;
            }
        });
        found
    }

    /// Count this element and descendants matching a predicate
    pub fn count<P>(&self, mut predicate: P) -> usize
    where
        P: FnMut(&[Ancestor], &SvgElement) -> bool,
    {
        let mut total = 0;
        self.walk(&mut |ancestors, element| {
            if predicate(ancestors, element) {
                total += 1;
            }
        });
        total
    }

    /// Parse SVG (or any XML) markup into an owned tree
    pub fn parse(markup: &str) -> Result<Self, DiagramError> {
        let document = roxmltree::Document::parse(markup)
            .map_err(|e| DiagramError::markup_error(e.to_string()))?;
        Ok(Self::from_node(document.root_element()))
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let mut element = SvgElement::new(qualified_name(
            node,
            node.tag_name().namespace(),
            node.tag_name().name(),
        ));

        let parent = node.parent_element();
        for ns in node.namespaces() {
            if ns.name() == Some("xml") {
                continue;
            }
            let inherited = parent.is_some_and(|p| {
                p.namespaces()
                    .any(|other| other.name() == ns.name() && other.uri() == ns.uri())
            });
            if inherited {
                continue;
            }
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{}", prefix),
                None => "xmlns".to_string(),
            };
            element.attrs.push((key, ns.uri().to_string()));
        }

        for attr in node.attributes() {
            let key = qualified_name(node, attr.namespace(), attr.name());
            element.attrs.push((key, attr.value().to_string()));
        }

        for child in node.children() {
            if child.is_element() {
                element
                    .children
                    .push(SvgNode::Element(Self::from_node(child)));
            } else if child.is_text() {
                if let Some(text) = child.text() {
                    element.children.push(SvgNode::Text(text.to_string()));
                }
            }
        }

        element
    }

    /// Serialize back to markup
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write_markup(&mut out);
        out
    }

    fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        for child in &self.children {
            match child {
                SvgNode::Element(element) => element.write_markup(out),
                SvgNode::Text(text) => escape_into(text, false, out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

impl fmt::Display for SvgElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

fn qualified_name(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => local.to_string(),
    }
}

fn escape_into(raw: &str, attribute: bool, out: &mut String) {
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
