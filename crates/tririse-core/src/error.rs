//! Error types for tririse.

use thiserror::Error;

/// A color string that could not be resolved to RGB channels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid color: {input:?}")]
pub struct InvalidColorError {
    input: String,
}

impl InvalidColorError {
    /// Create an error for the given color string.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }

    /// The color string that failed to resolve.
    pub fn input(&self) -> &str {
        &self.input
    }
}
