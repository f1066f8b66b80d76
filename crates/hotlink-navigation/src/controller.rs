//! Navigation controller
//!
//! Owns the target address and the address currently displayed. A periodic
//! tick reconciles the two; it is the only path by which a background probe
//! result becomes visible.

use hotlink_probe::{ProbeReport, ProbeWorker};
use tokio::sync::watch;

use crate::page::{Page, PageSet};
use crate::target::TargetAddress;

/// Surface that renders pages (the browser engine)
pub trait RenderSurface: Send {
    fn load(&mut self, address: &str);
}

/// What an engine-reported address change means for the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlChange {
    /// Ordinary navigation
    Navigated,
    /// Blank address, redirected to the landing page
    Blank,
    /// The connecting page is showing: a new session starts
    SessionReset,
}

pub struct NavigationController {
    pages: PageSet,
    surface: Box<dyn RenderSurface>,
    worker: ProbeWorker,
    reports: watch::Receiver<Option<ProbeReport>>,
    gateway_port: u16,
    target: TargetAddress,
    displayed: String,
}

impl NavigationController {
    pub fn new(
        pages: PageSet,
        surface: Box<dyn RenderSurface>,
        worker: ProbeWorker,
        gateway_port: u16,
    ) -> Self {
        let reports = worker.subscribe();
        Self {
            pages,
            surface,
            worker,
            reports,
            gateway_port,
            target: TargetAddress::default(),
            displayed: String::new(),
        }
    }

    /// Apply the latest probe report and load the target if it changed.
    /// Returns true when the surface was told to navigate.
    pub fn tick(&mut self) -> bool {
        if self.reports.has_changed().unwrap_or(false) {
            let report = self.reports.borrow_and_update().clone();
            if let Some(report) = report {
                tracing::debug!(
                    generation = report.generation,
                    outcome = ?report.outcome,
                    "Applying probe report"
                );
                self.target = TargetAddress::from_probe(&report.outcome, self.gateway_port);
            }
        }

        if self.target.href(&self.pages) != self.displayed {
            self.load_target();
            return true;
        }
        false
    }

    /// Show the connecting page and start a fresh probe
    pub fn reconnect(&mut self) -> u64 {
        tracing::info!("Reconnecting");
        self.navigate(TargetAddress::Page(Page::Connecting));
        self.start_probe()
    }

    pub fn start_probe(&mut self) -> u64 {
        self.worker.spawn()
    }

    pub fn navigate(&mut self, target: TargetAddress) {
        self.target = target;
        self.load_target();
    }

    /// Hand an address to the surface without adopting it as the target.
    /// Used for download URLs, which start a transfer instead of a page.
    pub fn request(&mut self, address: &str) {
        tracing::debug!(address = %address, "Requesting address");
        self.surface.load(address);
    }

    pub fn on_load_finished(&mut self, ok: bool) {
        if !ok {
            tracing::warn!(address = %self.displayed, "Page failed to load");
            self.navigate(TargetAddress::Page(Page::NotOpen));
        }
    }

    /// Record an address change reported by the engine. The new address
    /// becomes the target so the next tick does not undo it.
    pub fn on_url_changed(&mut self, address: &str) -> UrlChange {
        self.displayed = address.to_string();

        if TargetAddress::is_blank(address) {
            self.navigate(TargetAddress::Page(Page::Index));
            return UrlChange::Blank;
        }

        self.target = TargetAddress::Url(address.to_string());
        if Page::from_address(address) == Some(Page::Connecting) {
            UrlChange::SessionReset
        } else {
            UrlChange::Navigated
        }
    }

    /// Reconnect and download controls only make sense on the phone's pages
    pub fn affordances_enabled(&self) -> bool {
        !TargetAddress::is_blank(&self.displayed) && Page::from_address(&self.displayed).is_none()
    }

    pub fn target(&self) -> &TargetAddress {
        &self.target
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    /// Generation of the most recently started probe
    pub fn latest_probe(&self) -> u64 {
        self.worker.latest_generation()
    }

    pub fn probe_reports(&self) -> watch::Receiver<Option<ProbeReport>> {
        self.worker.subscribe()
    }

    fn load_target(&mut self) {
        let href = self.target.href(&self.pages).to_string();
        tracing::info!(address = %href, "Loading page");
        self.surface.load(&href);
        self.displayed = href;
    }
}
