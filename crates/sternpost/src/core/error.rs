//! Core error types for diagram post-processing
//!
//! This module defines the error types shared by the tree, the passes, the
//! rendering collaborator and the preference store.

use thiserror::Error;

/// Core error types for diagram post-processing
#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("Markup error: {message}")]
    MarkupError { message: String },

    #[error("Points error: {message} in \"{points}\"")]
    PointsError { message: String, points: String },

    #[error("Render error: {source}")]
    Render {
        #[from]
        source: RenderError,
    },

    #[error("Preference error: {message}")]
    PreferenceError { message: String },

    #[error("Config error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl DiagramError {
    /// Create a new markup error
    pub fn markup_error(message: impl Into<String>) -> Self {
        Self::MarkupError {
            message: message.into(),
        }
    }

    /// Create a new points error
    pub fn points_error(message: impl Into<String>, points: impl Into<String>) -> Self {
        Self::PointsError {
            message: message.into(),
            points: points.into(),
        }
    }

    /// Create a new preference error
    pub fn preference_error(message: impl Into<String>) -> Self {
        Self::PreferenceError {
            message: message.into(),
        }
    }

    /// Create a new config error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }
}

/// Failure reported by the rendering collaborator
///
/// The message is shown verbatim (escaped) in the error display that
/// replaces the container content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The diagram description could not be parsed by the renderer
    #[error("{message}")]
    Syntax { message: String },

    /// The renderer was used before `initialize` was called
    #[error("renderer not initialized")]
    NotInitialized,

    /// The renderer could not be reached or crashed
    #[error("renderer unavailable: {message}")]
    Unavailable { message: String },
}

impl RenderError {
    /// Create a syntax error
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}
