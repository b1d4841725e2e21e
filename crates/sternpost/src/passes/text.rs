//! Text color fixes
//!
//! Forces every label to the mode's text color. Runs for all diagram kinds
//! and both modes.

use tracing::debug;

use super::Pass;
use crate::core::{ColorMode, SvgElement};

/// Force text fills, node label colors and cluster title weight
#[derive(Debug, Clone, Copy, Default)]
pub struct TextColors;

impl TextColors {
    pub fn new() -> Self {
        Self
    }
}

impl Pass for TextColors {
    fn name(&self) -> &'static str {
        "text-colors"
    }

    fn apply(&self, root: &mut SvgElement, mode: ColorMode) -> usize {
        let color = mode.palette().text;
        let mut touched = 0;

        root.walk_mut(&mut |ancestors, element| {
            let is_text = element.is("text") || element.is("tspan");
            let is_node_label = element.has_class("nodeLabel")
                || ancestors.iter().any(|a| a.has_class("nodeLabel"));
            if !is_text && !is_node_label {
                return;
            }

            if is_text {
                element.set_style_property("fill", color);
                element.set_style_property("stroke", "none");
                if ancestors.iter().any(|a| a.is("g") && a.has_class("cluster")) {
                    element.set_style_property("font-weight", "600");
                }
            }
            if is_node_label {
                element.set_style_property("fill", color);
                element.set_style_property("color", color);
            }
            touched += 1;
        });

        debug!(touched, %mode, "Text colors applied");
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> SvgElement {
        SvgElement::parse(
            r#"<svg><g class="cluster"><text>Group</text></g><g class="node"><foreignObject><div><span class="nodeLabel">A</span></div></foreignObject></g><text style="fill: red"><tspan>B</tspan></text><rect/></svg>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_dark_text_fill() {
        let mut root = tree();
        TextColors.apply(&mut root, ColorMode::Dark);
        let mut fills = Vec::new();
        root.walk(&mut |_, el| {
            if el.is("text") || el.is("tspan") {
                fills.push(el.style_property("fill"));
            }
        });
        assert_eq!(fills.len(), 3);
        assert!(fills.iter().all(|f| f.as_deref() == Some("#f1f5f9")));
    }

    #[test]
    fn test_cluster_weight_and_node_label_color() {
        let mut root = tree();
        let touched = TextColors.apply(&mut root, ColorMode::Light);
        assert_eq!(touched, 4);
        let mut cluster_weight = None;
        let mut label_color = None;
        root.walk(&mut |_, el| {
            if el.is("text") && el.text_content() == "Group" {
                cluster_weight = el.style_property("font-weight");
            }
            if el.has_class("nodeLabel") {
                label_color = el.style_property("color");
            }
        });
        assert_eq!(cluster_weight.as_deref(), Some("600"));
        assert_eq!(label_color.as_deref(), Some("#1e293b"));
    }

    #[test]
    fn test_other_elements_untouched() {
        let mut root = tree();
        TextColors.apply(&mut root, ColorMode::Dark);
        let rect = root.element_children().last().unwrap();
        assert!(rect.attr("style").is_none());
    }
}
