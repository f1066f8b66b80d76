//! Target address
//!
//! Where the render surface should currently point: a bundled page or any
//! other URL (the phone's endpoint, or wherever the user navigated on it).

use hotlink_probe::ProbeOutcome;
use serde::{Deserialize, Serialize};

use crate::page::{Page, PageSet};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TargetAddress {
    Page(Page),
    Url(String),
}

impl TargetAddress {
    /// Address to hand to the render surface
    pub fn href<'a>(&'a self, pages: &'a PageSet) -> &'a str {
        match self {
            TargetAddress::Page(page) => pages.url(*page),
            TargetAddress::Url(url) => url,
        }
    }

    /// Bundled page this target shows, if any
    pub fn page(&self) -> Option<Page> {
        match self {
            TargetAddress::Page(page) => Some(*page),
            TargetAddress::Url(url) => Page::from_address(url),
        }
    }

    /// Map a probe outcome onto the page or endpoint to show
    pub fn from_probe(outcome: &ProbeOutcome, gateway_port: u16) -> Self {
        match outcome.endpoint(gateway_port) {
            Some(endpoint) => TargetAddress::Url(endpoint),
            None => match outcome {
                ProbeOutcome::NoAdapter => TargetAddress::Page(Page::NoWifi),
                _ => TargetAddress::Page(Page::NotConnected),
            },
        }
    }

    /// Empty or `about:blank` addresses carry no page
    pub fn is_blank(address: &str) -> bool {
        let address = address.trim();
        address.is_empty() || address == "about:blank"
    }
}

impl Default for TargetAddress {
    fn default() -> Self {
        TargetAddress::Page(Page::Index)
    }
}
