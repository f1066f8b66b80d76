//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Probe error: {0}")]
    Probe(#[from] hotlink_probe::ProbeError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] hotlink_navigation::NavigationError),

    #[error("Download error: {0}")]
    Download(#[from] hotlink_download::DownloadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
