//! Error types shared across the crate

use thiserror::Error;

use crate::layout::{ConfigError, LayoutError};

/// Errors raised while loading an input document
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read input file: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON, including a missing required array
    #[error("Failed to parse input JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur anywhere in the load-layout-serialize pipeline
#[derive(Debug, Error)]
pub enum Error {
    #[error("input error: {0}")]
    Input(#[from] InputError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Failure serializing the layout to JSON
    #[error("output error: {0}")]
    Output(#[from] serde_json::Error),
}
