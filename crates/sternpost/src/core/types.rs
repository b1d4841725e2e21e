//! Core type definitions for diagram post-processing
//!
//! Color mode, the fixed palettes, the shared theme handle and diagram kind
//! detection.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Page presentation mode driving every palette decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    /// Returns true for dark mode
    pub fn is_dark(&self) -> bool {
        matches!(self, ColorMode::Dark)
    }

    /// The other mode
    pub fn toggled(&self) -> Self {
        match self {
            ColorMode::Light => ColorMode::Dark,
            ColorMode::Dark => ColorMode::Light,
        }
    }

    /// Mode derived from the system color-scheme preference
    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    /// Fixed palette for this mode
    pub fn palette(&self) -> &'static Palette {
        match self {
            ColorMode::Light => &Palette::LIGHT,
            ColorMode::Dark => &Palette::DARK,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ColorMode::Light),
            "dark" => Ok(ColorMode::Dark),
            _ => Err(format!("Unknown color mode: {}", s)),
        }
    }
}

/// Named colors for one color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Page background
    pub background: &'static str,
    /// Accent used for borders and titles
    pub primary: &'static str,
    /// Body text
    pub text: &'static str,
    /// Secondary text such as edge labels
    pub muted_text: &'static str,
    /// Connector lines
    pub line: &'static str,
    /// Emphasized connector lines and arrowheads
    pub line_strong: &'static str,
    /// Node and box fill
    pub secondary: &'static str,
    /// Cluster and note fill
    pub tertiary: &'static str,
    /// Error display accent
    pub error: &'static str,
    /// Error display background
    pub error_background: &'static str,
    /// Error detail text
    pub error_detail: &'static str,
    /// Code block background in the error display
    pub code_background: &'static str,
}

impl Palette {
    pub const LIGHT: Palette = Palette {
        background: "#ffffff",
        primary: "#3b82f6",
        text: "#1e293b",
        muted_text: "#475569",
        line: "#64748b",
        line_strong: "#334155",
        secondary: "#e2e8f0",
        tertiary: "#f8fafc",
        error: "#dc2626",
        error_background: "#fef2f2",
        error_detail: "#6b7280",
        code_background: "#f9fafb",
    };

    pub const DARK: Palette = Palette {
        background: "#0f172a",
        primary: "#60a5fa",
        text: "#f1f5f9",
        muted_text: "#cbd5e1",
        line: "#94a3b8",
        line_strong: "#cbd5e1",
        secondary: "#334155",
        tertiary: "#1e293b",
        error: "#f87171",
        error_background: "#1e293b",
        error_detail: "#cbd5e1",
        code_background: "#0f172a",
    };
}

/// Shared, re-readable color mode
///
/// Cloning shares the underlying cell. Passes never cache the mode: they
/// call [`ThemeState::mode`] at invocation time because a toggle can land
/// between a render request and the delayed passes scheduled after it.
#[derive(Debug, Clone, Default)]
pub struct ThemeState(Rc<Cell<ColorMode>>);

impl ThemeState {
    pub fn new(mode: ColorMode) -> Self {
        Self(Rc::new(Cell::new(mode)))
    }

    pub fn mode(&self) -> ColorMode {
        self.0.get()
    }

    pub fn set(&self, mode: ColorMode) {
        self.0.set(mode);
    }
}

/// Diagram kinds recognized from description text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagramKind {
    Flowchart,
    Sequence,
    Class,
    EntityRelationship,
    State,
    GitGraph,
    Other,
}

impl DiagramKind {
    /// Detect the kind from the first meaningful line of a description
    ///
    /// Skips blank lines, `%%` comments and a leading `---` front-matter
    /// block.
    pub fn detect(text: &str) -> Self {
        let mut in_front_matter = false;
        for line in text.lines().map(str::trim) {
            if line == "---" {
                in_front_matter = !in_front_matter;
                continue;
            }
            if in_front_matter || line.is_empty() || line.starts_with("%%") {
                continue;
            }
            let keyword = line
                .split(|c: char| c.is_whitespace() || c == ';')
                .next()
                .unwrap_or("")
                .to_lowercase();
            return match keyword.as_str() {
                "graph" | "flowchart" | "flowchart-elk" => DiagramKind::Flowchart,
                "sequencediagram" => DiagramKind::Sequence,
                "classdiagram" | "classdiagram-v2" => DiagramKind::Class,
                "erdiagram" => DiagramKind::EntityRelationship,
                "statediagram" | "statediagram-v2" => DiagramKind::State,
                "gitgraph" => DiagramKind::GitGraph,
                _ => DiagramKind::Other,
            };
        }
        DiagramKind::Other
    }
}

impl fmt::Display for DiagramKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagramKind::Flowchart => write!(f, "flowchart"),
            DiagramKind::Sequence => write!(f, "sequence"),
            DiagramKind::Class => write!(f, "class"),
            DiagramKind::EntityRelationship => write!(f, "er"),
            DiagramKind::State => write!(f, "state"),
            DiagramKind::GitGraph => write!(f, "gitgraph"),
            DiagramKind::Other => write!(f, "other"),
        }
    }
}
