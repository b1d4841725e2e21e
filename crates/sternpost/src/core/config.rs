//! Configuration
//!
//! [`RendererConfig`] is the object handed to the rendering collaborator's
//! `initialize` (serialized as mermaid's camelCase configuration JSON).
//! [`ProcessorConfig`] holds the pipeline's own thresholds and delays.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{ColorMode, Palette};

/// Mermaid `initialize` configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    pub start_on_load: bool,
    pub theme: String,
    pub theme_variables: ThemeVariables,
    pub flowchart: FlowchartOptions,
    pub class: ClassOptions,
    pub er: ErOptions,
    pub sequence: SequenceOptions,
    pub security_level: String,
    #[serde(rename = "themeCSS")]
    pub theme_css: String,
    pub max_text_size: u32,
    pub max_edges: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeVariables {
    pub dark_mode: bool,
    pub background: String,
    pub primary_color: String,
    pub primary_text_color: String,
    pub line_color: String,
    pub secondary_color: String,
    pub tertiary_color: String,
    pub primary_border_color: String,
    pub class_text: String,
    pub attribute_background_color_odd: String,
    pub attribute_background_color_even: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowchartOptions {
    pub use_max_width: bool,
    pub html_labels: bool,
    pub curve: String,
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassOptions {
    pub use_max_width: bool,
    pub html_labels: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErOptions {
    pub use_max_width: bool,
    pub entity_padding: u32,
    pub font_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceOptions {
    pub use_max_width: bool,
    pub wrap: bool,
    pub message_font_size: u32,
    pub note_font_size: u32,
}

impl RendererConfig {
    /// Configuration for the given color mode
    pub fn for_mode(mode: ColorMode) -> Self {
        let palette = mode.palette();
        let (attr_odd, attr_even) = match mode {
            ColorMode::Light => ("#f1f5f9", "#e2e8f0"),
            ColorMode::Dark => ("#334155", "#1e293b"),
        };

        Self {
            start_on_load: false,
            theme: "base".to_string(),
            theme_variables: ThemeVariables {
                dark_mode: mode.is_dark(),
                background: palette.background.to_string(),
                primary_color: palette.primary.to_string(),
                primary_text_color: palette.text.to_string(),
                line_color: palette.line.to_string(),
                secondary_color: palette.secondary.to_string(),
                tertiary_color: palette.tertiary.to_string(),
                primary_border_color: palette.primary.to_string(),
                class_text: palette.text.to_string(),
                attribute_background_color_odd: attr_odd.to_string(),
                attribute_background_color_even: attr_even.to_string(),
            },
            flowchart: FlowchartOptions {
                use_max_width: true,
                html_labels: true,
                curve: "basis".to_string(),
                padding: 15,
            },
            class: ClassOptions {
                use_max_width: true,
                html_labels: true,
            },
            er: ErOptions {
                use_max_width: true,
                entity_padding: 15,
                font_size: 12,
            },
            sequence: SequenceOptions {
                use_max_width: true,
                wrap: true,
                message_font_size: 12,
                note_font_size: 11,
            },
            security_level: "loose".to_string(),
            theme_css: theme_css(palette),
            max_text_size: 50_000,
            max_edges: 500,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Stylesheet injected into every rendered diagram
///
/// Carries no polygon transform; decision shapes are resized by
/// [`crate::passes::DecisionRescale`].
pub fn theme_css(p: &Palette) -> String {
    format!(
        "g.node rect {{ fill: {secondary} !important; stroke: {primary} !important; stroke-width: 1.5px !important; rx: 4px; ry: 4px; }}\n\
         g.node polygon {{ fill: {secondary} !important; stroke: {primary} !important; stroke-width: 2px !important; }}\n\
         g.cluster rect {{ fill: {tertiary} !important; stroke: {line} !important; stroke-width: 1.5px !important; rx: 6px; ry: 6px; }}\n\
         text, tspan {{ fill: {text} !important; font-family: 'Inter', sans-serif !important; font-size: 12px !important; font-weight: 500 !important; stroke: none !important; }}\n\
         g.classGroup text, g.classGroup tspan {{ fill: {text} !important; font-size: 11px !important; }}\n\
         g.classGroup .title, g.classGroup .classTitle {{ fill: {primary} !important; font-size: 14px !important; font-weight: 700 !important; }}\n\
         path {{ stroke: {line} !important; stroke-width: 1.5px !important; fill: none !important; }}\n\
         marker path {{ fill: {line} !important; stroke: {line} !important; }}\n\
         g.entityBox rect {{ fill: {secondary} !important; stroke: {primary} !important; }}\n\
         g.entityBox text {{ fill: {text} !important; }}\n\
         g.edgeLabel text, g.edgeLabel tspan {{ fill: {muted} !important; font-size: 10px !important; }}\n\
         g.cluster text, g.cluster tspan {{ fill: {text} !important; font-weight: 600 !important; font-size: 13px !important; }}\n",
        secondary = p.secondary,
        primary = p.primary,
        tertiary = p.tertiary,
        line = p.line,
        text = p.text,
        muted = p.muted_text,
    )
}

/// Pipeline thresholds and delays
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    /// Trimmed descriptions shorter than this are skipped
    pub min_text_len: usize,
    /// Pause after each container in `render_all`
    pub inter_render_delay: Duration,
    /// Delays after which the palette pass is re-applied to rendered containers
    pub settle_delays: Vec<Duration>,
    /// Pause between resetting containers and initializing again
    pub reinit_delay: Duration,
    /// Pause before a recovery reinitialization
    pub recovery_delay: Duration,
    /// Prefix for generated diagram ids
    pub id_prefix: String,
    /// Member rewrites applied to class diagram descriptions before rendering
    pub class_member_abbreviations: Vec<(String, String)>,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            min_text_len: 10,
            inter_render_delay: Duration::from_millis(100),
            settle_delays: vec![Duration::from_millis(100), Duration::from_millis(500)],
            reinit_delay: Duration::from_millis(100),
            recovery_delay: Duration::from_millis(1000),
            id_prefix: "mermaid".to_string(),
            class_member_abbreviations: [
                ("+str productName", "+str prodName"),
                ("+text description", "+text desc"),
                ("+num qualityScore", "+num quality"),
            ]
            .into_iter()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect(),
        }
    }
}

impl ProcessorConfig {
    /// Config with every delay set to zero
    pub fn without_delays() -> Self {
        Self {
            inter_render_delay: Duration::ZERO,
            settle_delays: Vec::new(),
            reinit_delay: Duration::ZERO,
            recovery_delay: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_min_text_len(mut self, min_text_len: usize) -> Self {
        self.min_text_len = min_text_len;
        self
    }

    pub fn with_settle_delays(mut self, delays: Vec<Duration>) -> Self {
        self.settle_delays = delays;
        self
    }
}
