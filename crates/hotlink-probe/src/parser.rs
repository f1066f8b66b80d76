//! Adapter status parser
//!
//! Reads `ipconfig`-style output:
//! ```text
//! Wireless LAN adapter Wi-Fi:
//!
//!    Connection-specific DNS Suffix  . :
//!    IPv4 Address. . . . . . . . . . . : 192.168.43.100
//!    Default Gateway . . . . . . . . . : 192.168.43.1
//! ```
//! The format is fragile and tied to one platform. In particular a gateway
//! line holding an IPv6 address is assumed to continue with the IPv4 gateway
//! on the following line; that is a compatibility heuristic, not general
//! IPv6 support.

use serde::{Deserialize, Serialize};

/// Section header of the wireless adapter, compared case-insensitively
pub const DEFAULT_ADAPTER_HEADER: &str = "wireless lan adapter wi-fi:";

const MEDIA_DISCONNECTED: &str = "media disconnected";
const GATEWAY_LABEL: &str = "default gateway";

/// Why a present adapter was judged not connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disconnect {
    /// Adapter reports its media as disconnected
    MediaDisconnected,
    /// No gateway entry in the adapter block
    NoGateway,
    /// Multi-colon gateway line with nothing after it
    MissingContinuation,
    /// Gateway entry without a value
    EmptyGateway,
}

/// Result of one probe run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// No wireless adapter section in the status output
    NoAdapter,
    /// Adapter present but not attached to a hotspot
    NotConnected { reason: Disconnect },
    /// Gateway found
    Reachable { gateway: String },
}

impl ProbeOutcome {
    /// HTTP endpoint of the phone's web server, if reachable
    pub fn endpoint(&self, port: u16) -> Option<String> {
        match self {
            ProbeOutcome::Reachable { gateway } => Some(format!("http://{}:{}", gateway, port)),
            _ => None,
        }
    }

    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }
}

/// Parse adapter status text into a probe outcome
pub fn parse_adapter_status(text: &str, adapter_header: &str) -> ProbeOutcome {
    let header = adapter_header.trim().to_lowercase();
    let lines: Vec<String> = text.lines().map(str::to_lowercase).collect();

    let Some(header_index) = lines.iter().position(|line| line.trim() == header) else {
        return ProbeOutcome::NoAdapter;
    };

    let disconnected = lines
        .iter()
        .skip(header_index + 1)
        .take(2)
        .any(|line| line.trim_end().ends_with(MEDIA_DISCONNECTED));
    if disconnected {
        return not_connected(Disconnect::MediaDisconnected);
    }

    let block_end = lines
        .iter()
        .enumerate()
        .skip(header_index + 1)
        .find(|(_, line)| starts_section(line))
        .map(|(index, _)| index)
        .unwrap_or(lines.len());

    let Some(gateway_index) = (header_index + 1..block_end)
        .find(|&index| lines[index].contains(GATEWAY_LABEL))
    else {
        return not_connected(Disconnect::NoGateway);
    };

    let mut address_line = lines[gateway_index].as_str();
    if address_line.matches(':').count() > 1 {
        match lines.get(gateway_index + 1) {
            Some(next) => address_line = next.as_str(),
            None => return not_connected(Disconnect::MissingContinuation),
        }
    }

    let gateway = address_line
        .rsplit(':')
        .next()
        .unwrap_or_default()
        .trim();
    if gateway.is_empty() {
        return not_connected(Disconnect::EmptyGateway);
    }

    ProbeOutcome::Reachable {
        gateway: gateway.to_string(),
    }
}

fn not_connected(reason: Disconnect) -> ProbeOutcome {
    ProbeOutcome::NotConnected { reason }
}

/// Adapter sections start at column zero; their properties are indented
fn starts_section(line: &str) -> bool {
    !line.trim().is_empty() && !line.starts_with(char::is_whitespace)
}
