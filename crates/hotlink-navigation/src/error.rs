//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid resources path: {0}")]
    InvalidPath(String),

    #[error("Unknown page: {0}")]
    UnknownPage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
