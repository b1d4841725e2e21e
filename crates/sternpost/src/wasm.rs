//! WebAssembly bindings for Sternpost
//!
//! Exposes the SVG passes to a page script. The page script keeps driving
//! the renderer itself and hands each produced SVG string through
//! [`postprocess_svg`] before inserting it.

use wasm_bindgen::prelude::*;

use crate::core::{ColorMode, SvgElement};
use crate::passes::{decision, DiagramReport, Pass, PaletteOverrides};
use crate::pipeline::error_display;

/// Initialize WASM module
///
/// Sets up panic hooks and logging for better error messages in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use crate::core::logging::init_logging;
    let _ = init_logging(Some("info"), None);
}

fn parse_mode(mode: &str) -> Result<ColorMode, JsValue> {
    mode.parse::<ColorMode>()
        .map_err(|e| JsValue::from_str(&e))
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Run every pass over rendered SVG markup
///
/// # Arguments
/// * `markup` - SVG produced by the renderer
/// * `mode` - "light" or "dark"
///
/// # Returns
/// * The processed markup
/// * Throws a JavaScript error if the mode is unknown or the markup malformed
#[wasm_bindgen]
pub fn postprocess_svg(markup: &str, mode: &str) -> Result<String, JsValue> {
    let mode = parse_mode(mode)?;
    crate::postprocess_svg(markup, mode).map_err(to_js)
}

/// Re-apply only the dark palette, for the settle passes after a render
#[wasm_bindgen]
pub fn reapply_palette(markup: &str, mode: &str) -> Result<String, JsValue> {
    let mode = parse_mode(mode)?;
    let mut root = SvgElement::parse(markup).map_err(to_js)?;
    PaletteOverrides.apply(&mut root, mode);
    Ok(root.to_markup())
}

/// Renderer `initialize` configuration for `mode`, as JSON
#[wasm_bindgen]
pub fn renderer_config(mode: &str) -> Result<String, JsValue> {
    let mode = parse_mode(mode)?;
    crate::core::RendererConfig::for_mode(mode)
        .to_json()
        .map_err(to_js)
}

/// HTML shown in place of a diagram that failed to render
#[wasm_bindgen]
pub fn render_error_html(message: &str, mode: &str) -> Result<String, JsValue> {
    let mode = parse_mode(mode)?;
    Ok(error_display(message, mode))
}

/// Whether a polygon `points` attribute outlines a decision shape
#[wasm_bindgen]
pub fn is_decision_shape(points: &str) -> bool {
    decision::classify_points(points)
        .map(|c| c.is_diamond())
        .unwrap_or(false)
}

/// Marker and shape counts for SVG markup, as JSON
#[wasm_bindgen]
pub fn inspect_svg(markup: &str) -> Result<String, JsValue> {
    let root = SvgElement::parse(markup).map_err(to_js)?;
    serde_json::to_string(&DiagramReport::of(&root)).map_err(to_js)
}
