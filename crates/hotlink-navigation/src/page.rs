//! Bundled informational pages
//!
//! Static pages shipped with the application and shown when the phone's
//! server is not (yet) reachable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::NavigationError;
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    /// Landing page
    Index,
    /// Shown while a probe is running
    Connecting,
    Help,
    /// No wireless adapter on this machine
    NoWifi,
    /// Wireless adapter not joined to the phone's hotspot
    NotConnected,
    /// Phone endpoint failed to load
    NotOpen,
    About,
    License,
}

impl Page {
    pub const ALL: [Page; 8] = [
        Page::Index,
        Page::Connecting,
        Page::Help,
        Page::NoWifi,
        Page::NotConnected,
        Page::NotOpen,
        Page::About,
        Page::License,
    ];

    pub fn file_name(&self) -> &'static str {
        match self {
            Page::Index => "index.htm",
            Page::Connecting => "connecting.htm",
            Page::Help => "help.htm",
            Page::NoWifi => "no-wifi.htm",
            Page::NotConnected => "not-connected.htm",
            Page::NotOpen => "not-open.htm",
            Page::About => "about.htm",
            Page::License => "gnu-gplv3.htm",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Page::Index => "index",
            Page::Connecting => "connecting",
            Page::Help => "help",
            Page::NoWifi => "no-wifi",
            Page::NotConnected => "not-connected",
            Page::NotOpen => "not-open",
            Page::About => "about",
            Page::License => "license",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|page| page.file_name() == name)
    }

    /// Bundled page an address points at, judged by the text after its
    /// last `/` so it matches however the resources directory is spelled
    pub fn from_address(address: &str) -> Option<Self> {
        let address = address.split(['?', '#']).next().unwrap_or_default();
        let name = address.rsplit('/').next()?;
        Self::from_file_name(name)
    }
}

impl std::fmt::Display for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Page {
    type Err = NavigationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|page| page.as_str() == s.to_lowercase())
            .ok_or_else(|| NavigationError::UnknownPage(s.to_string()))
    }
}

/// Bundled pages resolved to `file://` URLs under one directory
#[derive(Debug, Clone)]
pub struct PageSet {
    resources_dir: PathBuf,
    urls: HashMap<Page, String>,
}

impl PageSet {
    pub fn new(resources_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = resources_dir.as_ref();
        let resources_dir = if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            std::env::current_dir()?.join(dir)
        };

        let mut urls = HashMap::new();
        for page in Page::ALL {
            let path = resources_dir.join(page.file_name());
            let url = Url::from_file_path(&path)
                .map_err(|_| NavigationError::InvalidPath(path.display().to_string()))?;
            urls.insert(page, url.to_string());
        }

        Ok(Self {
            resources_dir,
            urls,
        })
    }

    pub fn url(&self, page: Page) -> &str {
        self.urls.get(&page).map(String::as_str).unwrap_or_default()
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }
}
