//! Inline style declarations
//!
//! Passes force-set individual properties on the `style` attribute the way
//! `element.style.fill = ...` would in a browser: existing properties keep
//! their position, new ones are appended, and serialization is stable so
//! repeated passes produce byte-identical attributes.

use std::fmt;

/// Ordered list of `property: value` pairs
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDeclarations {
    entries: Vec<(String, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `style` attribute value
    ///
    /// Empty segments and segments without a colon are dropped. Property
    /// names are lowercased; values are trimmed but otherwise kept.
    pub fn parse(input: &str) -> Self {
        let mut style = Self::new();
        for segment in input.split(';') {
            let Some((property, value)) = segment.split_once(':') else {
                continue;
            };
            let property = property.trim().to_lowercase();
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            style.set(&property, value);
        }
        style
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Set a property, replacing the value in place when already present
    pub fn set(&mut self, property: &str, value: &str) {
        match self.entries.iter_mut().find(|(name, _)| name == property) {
            Some(entry) => entry.1 = value.to_string(),
            None => self
                .entries
                .push((property.to_string(), value.to_string())),
        }
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.entries.iter().position(|(name, _)| name == property)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for StyleDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (property, value)) in self.entries.iter().enumerate() {
            if index > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}
