//! Engine download events

use serde::{Deserialize, Serialize};

/// Download state as reported by the browser engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    Requested,
    InProgress,
    Completed,
    Cancelled,
    /// Any other terminal state the engine reports
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DownloadEvent {
    /// Bytes received so far; `total` is zero or negative when unknown
    Progress { received: i64, total: i64 },
    StateChanged { state: EngineState },
    PausedChanged { paused: bool },
    Finished,
}

impl DownloadEvent {
    /// Events that claim the transfer completed and need a file check
    pub fn reports_completion(&self) -> bool {
        matches!(
            self,
            DownloadEvent::Finished
                | DownloadEvent::StateChanged {
                    state: EngineState::Completed
                }
        )
    }
}
