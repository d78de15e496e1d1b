use std::path::PathBuf;
use thiserror::Error;

/// Failures to obtain the report text. Both variants are fatal for a run.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("File '{}' not found", path.display())]
    NotFound { path: PathBuf },
    #[error("Error while reading file '{}': {source}", path.display())]
    Unreadable { path: PathBuf, source: std::io::Error },
}

impl InputError {
    /// Classify an I/O failure on `path` into one of the two fatal input conditions.
    #[must_use]
    pub fn from_io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            InputError::NotFound { path: path.to_path_buf() }
        } else {
            InputError::Unreadable { path: path.to_path_buf(), source }
        }
    }
}

#[derive(Debug, Error)]
pub enum MapperError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export to {} failed: {source}", path.display())]
    Export { path: PathBuf, source: std::io::Error },

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Visualization error: {0}")]
    Visualization(String),
}
