//! Error types for the reader segment helpers
//!
//! The matching predicates never fail: malformed optional data is treated as
//! absent. Errors only surface from the parsing, configuration and host APIs.

use thiserror::Error;

pub use crate::cfi::CfiParseError;

/// Errors raised by a dialog host
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error("Native modal dialogs are not supported by this host")]
    Unsupported,

    #[error("showModal() failed: {0}")]
    ShowModal(String),

    #[error("Failed to create element <{0}>")]
    CreateElement(String),

    #[error("DOM operation failed: {0}")]
    Dom(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid modal configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid modal configuration value: {0}")]
    Value(String),
}
