//! Hotlink Download Tracker
//!
//! Follows downloads started by the browser engine:
//! - One record per download, de-duplicated by destination path
//! - Pure state machine driven by engine events
//! - Completion verified against the file on disk
//! - Pause / resume / cancel / retry / remove actions

mod action;
mod error;
mod event;
mod handle;
mod record;
mod size;
mod tracker;

pub use action::{ActionMenu, DownloadAction};
pub use error::DownloadError;
pub use event::{DownloadEvent, EngineState};
pub use handle::DownloadHandle;
pub use record::{DownloadRecord, DownloadState};
pub use size::{format_size, progress_status};
pub use tracker::{DownloadTracker, EventOutcome};

pub type Result<T> = std::result::Result<T, DownloadError>;
