//! Error types for Treeflow operations.
//!
//! This module provides the main error type [`TreeflowError`] which wraps
//! the error conditions that can reach a caller. Layout itself never fails:
//! malformed documents degrade to an empty or partial layout instead.

use std::io;

use thiserror::Error;

use treeflow_parser::error::ParseError;

/// The main error type for Treeflow operations.
///
/// The `Parse` variant keeps the source text next to the diagnostics so
/// callers can render labeled snippets.
#[derive(Debug, Error)]
pub enum TreeflowError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(#[from] crate::export::Error),
}

impl TreeflowError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
