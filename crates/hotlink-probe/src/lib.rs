//! Hotlink Reachability Prober
//!
//! Works out whether the phone's hotspot is reachable by reading the host's
//! adapter status output and, when it is, which gateway endpoint to load.
//!
//! - Adapter status query (external command, blocking)
//! - Status text parser (pure)
//! - Background worker publishing reports through a single-slot channel

mod error;
mod parser;
mod prober;
mod query;

pub use error::ProbeError;
pub use parser::{parse_adapter_status, Disconnect, ProbeOutcome, DEFAULT_ADAPTER_HEADER};
pub use prober::{ProbeReport, ProbeWorker, Prober};
pub use query::{AdapterQuery, CommandQuery, StaticQuery};

/// Port the phone's hotspot web server listens on
pub const DEFAULT_GATEWAY_PORT: u16 = 33455;

pub type Result<T> = std::result::Result<T, ProbeError>;
