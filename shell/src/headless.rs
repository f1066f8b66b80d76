//! Headless render surface
//!
//! Stands in for the browser engine when running without a window: loads
//! are queued and played back to the shell as completed navigations.

use hotlink_core::{RenderSurface, Shell};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct HeadlessSurface {
    pending: Arc<Mutex<VecDeque<String>>>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report every queued load to the shell as a finished navigation.
    /// Nothing is fetched, so every load counts as successful.
    pub fn deliver(&self, shell: &mut Shell) -> usize {
        let mut delivered = 0;
        loop {
            let next = self.pending.lock().pop_front();
            let Some(address) = next else {
                break;
            };
            shell.on_url_changed(&address);
            shell.on_load_finished(true);
            delivered += 1;
        }
        delivered
    }
}

impl RenderSurface for HeadlessSurface {
    fn load(&mut self, address: &str) {
        tracing::debug!(address = %address, "Headless load");
        self.pending.lock().push_back(address.to_string());
    }
}
