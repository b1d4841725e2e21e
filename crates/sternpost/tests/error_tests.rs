//! Tests for core error types

use sternpost::core::{DiagramError, RenderError};

#[test]
fn test_markup_error() {
    let error = DiagramError::markup_error("unexpected end of stream");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Markup error"));
    assert!(error_msg.contains("unexpected end of stream"));
}

#[test]
fn test_points_error() {
    let error = DiagramError::points_error("odd number of coordinates", "0,0 10");
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Points error"));
    assert!(error_msg.contains("odd number of coordinates"));
    assert!(error_msg.contains("0,0 10"));
}

#[test]
fn test_preference_error() {
    let error = DiagramError::preference_error("not a preference file");
    assert!(format!("{}", error).contains("Preference error"));
}

#[test]
fn test_config_error() {
    let error = DiagramError::config_error("unknown mode");
    assert!(format!("{}", error).contains("Config error"));
}

#[test]
fn test_render_error_conversion() {
    let error: DiagramError = RenderError::syntax("Parse error on line 3").into();
    let error_msg = format!("{}", error);
    assert!(error_msg.contains("Render error"));
    assert!(error_msg.contains("Parse error on line 3"));
}

#[test]
fn test_syntax_message_is_bare() {
    assert_eq!(
        RenderError::syntax("Lexical error").to_string(),
        "Lexical error"
    );
    assert_eq!(
        RenderError::NotInitialized.to_string(),
        "renderer not initialized"
    );
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "prefs.json");
    let error: DiagramError = io_error.into();
    assert!(format!("{}", error).contains("IO error"));
}

#[test]
fn test_error_debug() {
    let error = DiagramError::markup_error("Test");
    let debug_str = format!("{:?}", error);
    assert!(debug_str.contains("MarkupError"));
}
