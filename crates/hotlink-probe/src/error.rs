//! Probe error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Adapter query could not be started: {0}")]
    Io(#[from] std::io::Error),

    #[error("Adapter query failed: {0}")]
    CommandFailed(String),

    #[error("No async runtime available for the probe worker")]
    NoRuntime,
}
