//! Core error types for diagram layout
//!
//! This module defines the error type shared by every stage of the pipeline,
//! from input validation through circle placement and rendering.

use thiserror::Error;

/// Core error types for diagram layout
#[derive(Error, Debug)]
pub enum DiagramError {
    /// No valid placement exists for some part of the diagram.
    ///
    /// This is the recoverable failure: the caller may retry with other
    /// heuristics or report the diagram as undrawable.
    #[error("Cannot draw diagram: {reason}")]
    CannotDraw { reason: String },

    /// A programming contract was broken (e.g. an unsupported split count).
    #[error("Invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Parse error: {message} at line {line}, column {column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl DiagramError {
    /// Create a new drawing failure
    pub fn cannot_draw(reason: impl Into<String>) -> Self {
        Self::CannotDraw {
            reason: reason.into(),
        }
    }

    /// Create a new invariant violation
    pub fn invariant_violation(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a new render error
    pub fn render_error(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// True for the recoverable "cannot draw" outcome.
    pub fn is_drawing_failure(&self) -> bool {
        matches!(self, Self::CannotDraw { .. })
    }

    /// True when the input itself was rejected before layout began.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Parse { .. } | Self::Json { .. }
        )
    }
}

/// Result alias used throughout the layout pipeline
pub type DiagramResult<T> = std::result::Result<T, DiagramError>;
