//! Hotlink Core
//!
//! Coordination layer for the Hotlink desktop shell. The shell owns all
//! state; the browser engine only renders pages and reports events.

mod config;
mod error;
mod opener;
mod panel;
mod shell;

pub use config::Config;
pub use error::CoreError;
pub use opener::{PlatformOpener, SystemOpener};
pub use panel::DownloadPanel;
pub use shell::Shell;

// Re-export core components
pub use hotlink_download::{
    format_size, ActionMenu, DownloadAction, DownloadError, DownloadEvent, DownloadHandle,
    DownloadRecord, DownloadState, DownloadTracker, EngineState, EventOutcome,
};
pub use hotlink_navigation::{
    NavigationController, NavigationError, Page, PageSet, RenderSurface, TargetAddress, UrlChange,
};
pub use hotlink_probe::{
    parse_adapter_status, AdapterQuery, CommandQuery, Disconnect, ProbeError, ProbeOutcome,
    ProbeReport, ProbeWorker, Prober, StaticQuery,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
