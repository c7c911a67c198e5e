//! Error types for tabtrans.

use tabtrans_sheet::SheetError;
use thiserror::Error;

/// Result type for tabtrans operations.
pub type TabResult<T> = Result<T, TabError>;

/// Errors that can occur in tabtrans.
///
/// Only structurally invalid input fails; missing sheets or snapshots are
/// reported as no-ops by the operations themselves.
#[derive(Debug, Error)]
pub enum TabError {
    /// Workbook decode or encode failure.
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML configuration could not be parsed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON configuration could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An operation needed a loaded workbook.
    #[error("No workbook loaded")]
    NoWorkbook,
}

impl TabError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
