//! Error display shown in place of a diagram that failed to render

use crate::core::ColorMode;

/// Heading text of the error display
pub const ERROR_HEADING: &str = "Diagram Rendering Error";

/// Explanation shown under the heading
pub const ERROR_HINT: &str = "Unable to render this diagram. Please check the syntax.";

/// HTML for a failed diagram, colored for `mode`
///
/// `message` is escaped as element text before it is placed in the details
/// block. Quotes are left as they are.
pub fn error_display(message: &str, mode: ColorMode) -> String {
    let p = mode.palette();
    format!(
        r#"<div class="diagram-error" style="padding: 2rem; text-align: center; color: {error}; border: 1px solid {error}; border-radius: 8px; background-color: {error_bg};">
  <p style="margin: 0 0 0.5rem 0;"><strong>{heading}</strong></p>
  <p style="font-size: 0.875rem; margin: 0; color: {detail};">{hint}</p>
  <details style="margin-top: 1rem; text-align: left;">
    <summary style="cursor: pointer; font-size: 0.75rem;">Error Details</summary>
    <pre style="font-size: 0.75rem; margin-top: 0.5rem; padding: 0.5rem; background: {code_bg}; border-radius: 4px; overflow: auto;">{message}</pre>
  </details>
</div>"#,
        error = p.error,
        error_bg = p.error_background,
        detail = p.error_detail,
        code_bg = p.code_background,
        heading = ERROR_HEADING,
        hint = ERROR_HINT,
        message = escape_text(message),
    )
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
