//! Hotlink Navigation
//!
//! Decides what the render surface shows:
//! 1. Probe result → phone endpoint or an informational page
//! 2. Load failure → "not open" page
//! 3. Reconnect → "connecting" page, then a fresh probe
//!
//! The controller is the single writer of the target address. Probe
//! results reach it through a watch channel drained on every tick.

mod controller;
mod error;
mod page;
mod target;

pub use controller::{NavigationController, RenderSurface, UrlChange};
pub use error::NavigationError;
pub use page::{Page, PageSet};
pub use target::TargetAddress;

pub type Result<T> = std::result::Result<T, NavigationError>;
