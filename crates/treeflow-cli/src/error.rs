//! Errors surfaced by the CLI.

use thiserror::Error;

use treeflow::TreeflowError;

use crate::{config::ConfigError, generate::GenerateError};

/// Everything that can stop a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Treeflow(#[from] TreeflowError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Generator error: {0}")]
    Generate(#[from] GenerateError),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Treeflow(TreeflowError::Io(err))
    }
}
