//! Main shell state container
//!
//! Routes browser engine callbacks and user commands to the navigation
//! controller and the download tracker. Everything here runs on the main
//! loop; only probes run elsewhere.

use std::sync::Arc;
use std::time::Instant;

use hotlink_download::{
    ActionMenu, DownloadAction, DownloadError, DownloadEvent, DownloadHandle, DownloadTracker,
    EventOutcome,
};
use hotlink_navigation::{NavigationController, PageSet, RenderSurface, UrlChange};
use hotlink_probe::{AdapterQuery, CommandQuery, ProbeWorker, Prober};

use crate::config::Config;
use crate::opener::SystemOpener;
use crate::panel::DownloadPanel;
use crate::Result;

pub struct Shell {
    config: Config,
    navigation: NavigationController,
    downloads: DownloadTracker,
    opener: Box<dyn SystemOpener>,
    panel: DownloadPanel,
    /// Action menu of the selected download, when open
    menu: Option<ActionMenu>,
}

impl Shell {
    /// Build a shell probing with the configured adapter command. Must be
    /// called from within a tokio runtime.
    pub fn new(
        config: Config,
        surface: Box<dyn RenderSurface>,
        opener: Box<dyn SystemOpener>,
    ) -> Result<Self> {
        let query = CommandQuery::from_argv(&config.adapter_command)?;
        Self::with_query(config, surface, opener, Arc::new(query))
    }

    pub fn with_query(
        config: Config,
        surface: Box<dyn RenderSurface>,
        opener: Box<dyn SystemOpener>,
        query: Arc<dyn AdapterQuery>,
    ) -> Result<Self> {
        config.validate()?;

        let pages = PageSet::new(&config.resources_dir)?;
        let prober = Prober::with_header(query, config.adapter_header.clone());
        let worker = ProbeWorker::from_current(prober)?;
        let navigation = NavigationController::new(pages, surface, worker, config.gateway_port);
        let panel = DownloadPanel::new(config.panel_timeout());

        tracing::info!(
            resources = %navigation.pages().resources_dir().display(),
            port = config.gateway_port,
            "Shell initialized"
        );

        Ok(Self {
            config,
            navigation,
            downloads: DownloadTracker::new(),
            opener,
            panel,
            menu: None,
        })
    }

    // === Timers ===

    /// Periodic update: reconcile the displayed page and expire the panel
    pub fn tick(&mut self, now: Instant) -> bool {
        let navigated = self.navigation.tick();
        if self.panel.expire(now) {
            self.menu = None;
        }
        navigated
    }

    // === Engine callbacks ===

    pub fn on_url_changed(&mut self, address: &str) -> UrlChange {
        let change = self.navigation.on_url_changed(address);
        if change == UrlChange::SessionReset {
            self.downloads.clear_session();
            self.menu = None;
            self.navigation.start_probe();
        }
        self.sync_affordances();
        change
    }

    pub fn on_load_finished(&mut self, ok: bool) {
        self.navigation.on_load_finished(ok);
        self.sync_affordances();
    }

    pub fn on_download_requested(&mut self, handle: Box<dyn DownloadHandle>) -> String {
        self.downloads.on_download_requested(handle)
    }

    pub fn on_download_event(&mut self, id: &str, event: DownloadEvent) -> Result<EventOutcome> {
        let outcome = self.downloads.handle_event(id, event)?;
        if outcome.hide_menu {
            self.menu = None;
        }
        Ok(outcome)
    }

    // === User commands ===

    pub fn reconnect(&mut self) -> u64 {
        self.panel.hide();
        self.menu = None;
        self.navigation.reconnect()
    }

    /// Toggle the downloads panel; returns the new visibility
    pub fn toggle_downloads(&mut self, now: Instant) -> bool {
        if !self.navigation.affordances_enabled() {
            return false;
        }
        let visible = self.panel.toggle(now);
        if !visible {
            self.menu = None;
        }
        visible
    }

    /// The pointer is over the panel or its button
    pub fn keep_downloads_open(&mut self, now: Instant) {
        self.panel.keep_alive(now);
    }

    pub fn select_download(&mut self, id: &str) -> Result<&ActionMenu> {
        let menu = self.downloads.actions(id)?;
        Ok(&*self.menu.insert(menu))
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    /// Run a menu action on a download
    pub fn perform(&mut self, id: &str, action: DownloadAction) -> Result<()> {
        let menu = self.downloads.actions(id)?;
        if !menu.offers(action) {
            return Err(DownloadError::ActionUnavailable {
                id: id.to_string(),
                action: action.label().to_string(),
            }
            .into());
        }

        match action {
            DownloadAction::Pause => self.downloads.pause(id)?,
            DownloadAction::Resume => self.downloads.resume(id)?,
            DownloadAction::Cancel => self.downloads.cancel(id)?,
            DownloadAction::Remove => {
                self.downloads.remove(id)?;
            }
            DownloadAction::Retry => {
                let url = self.downloads.retry(id)?;
                self.navigation.request(&url);
            }
            DownloadAction::Open => {
                let path = self.downloads.get(id)?.path.clone();
                self.opener.open(&path)?;
            }
            DownloadAction::Reveal => {
                let path = self.downloads.get(id)?.path.clone();
                self.opener.reveal(&path)?;
            }
        }

        self.menu = None;
        Ok(())
    }

    // === Accessors ===

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn navigation(&self) -> &NavigationController {
        &self.navigation
    }

    pub fn downloads(&self) -> &DownloadTracker {
        &self.downloads
    }

    pub fn panel(&self) -> &DownloadPanel {
        &self.panel
    }

    pub fn menu(&self) -> Option<&ActionMenu> {
        self.menu.as_ref()
    }

    /// Reconnect and downloads controls are hidden on bundled pages
    pub fn affordances_enabled(&self) -> bool {
        self.navigation.affordances_enabled()
    }

    fn sync_affordances(&mut self) {
        if !self.navigation.affordances_enabled() {
            self.panel.hide();
            self.menu = None;
        }
    }
}
