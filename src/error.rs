use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while composing, loading or writing notebooks.
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("Cell content is empty")]
    EmptyCell,

    #[error("Notebook has already been finalized")]
    AlreadyFinalized,

    #[error("Cannot find file ``{}``!", .0.display())]
    MissingAddon(PathBuf),

    #[error("Invalid store: {0}")]
    InvalidStore(String),

    #[error("Invalid notebook: {0}")]
    InvalidNotebook(String),

    #[error("Notebook execution failed: {0}")]
    Execution(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NotebookError>;
