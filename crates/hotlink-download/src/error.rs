//! Download error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Download not found: {0}")]
    NotFound(String),

    #[error("Action {action} is not available for download {id}")]
    ActionUnavailable { id: String, action: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
