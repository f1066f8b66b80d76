//! Downloads panel visibility
//!
//! The panel is toggled by the user and hides itself after a period without
//! interaction. Hovering it counts as interaction.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct DownloadPanel {
    visible: bool,
    timeout: Duration,
    hide_at: Option<Instant>,
}

impl DownloadPanel {
    pub fn new(timeout: Duration) -> Self {
        Self {
            visible: false,
            timeout,
            hide_at: None,
        }
    }

    /// Show or hide the panel; returns the new visibility
    pub fn toggle(&mut self, now: Instant) -> bool {
        if self.visible {
            self.hide();
        } else {
            self.visible = true;
            self.hide_at = Some(now + self.timeout);
        }
        self.visible
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.hide_at = None;
    }

    /// Restart the inactivity timer while the user interacts with the panel
    pub fn keep_alive(&mut self, now: Instant) {
        if self.visible {
            self.hide_at = Some(now + self.timeout);
        }
    }

    /// Hide the panel if its timer ran out. Returns true when it was hidden.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                tracing::debug!("Hiding downloads panel after inactivity");
                self.hide();
                true
            }
            _ => false,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
