//! Download record and its state machine
//!
//! ```text
//! Waiting ──in progress──▶ InProgress ◀──resume/pause──▶ Paused
//!    │                         │                           │
//!    └──────────── completed + file exists ───────────────▶ Finished
//!    └──────────── completed + file missing / cancelled ──▶ Cancelled
//!    └──────────── any other terminal engine state ───────▶ Failed
//! ```
//! Finished, Failed and Cancelled are terminal. A Finished download drops
//! to Cancelled if a later completion event finds the file gone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

use crate::event::{DownloadEvent, EngineState};
use crate::size::{format_size, progress_status};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadState {
    /// Requested, no data yet
    Waiting,
    InProgress,
    Paused,
    /// Completed and present on disk
    Finished,
    Failed,
    /// Cancelled, or reported complete with the file missing
    Cancelled,
}

impl DownloadState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DownloadState::Finished | DownloadState::Failed | DownloadState::Cancelled
        )
    }

    /// Next state for an event. `file_exists` only matters for events that
    /// report completion. A finished download is re-checked on every
    /// completion event, since the engine may report completion twice.
    pub fn apply(self, event: &DownloadEvent, file_exists: bool) -> DownloadState {
        if self == DownloadState::Finished && event.reports_completion() {
            return Self::completion(file_exists);
        }
        if self.is_terminal() {
            return self;
        }

        match event {
            DownloadEvent::Progress { .. } => self,
            DownloadEvent::PausedChanged { paused: true } => DownloadState::Paused,
            DownloadEvent::PausedChanged { paused: false } => DownloadState::InProgress,
            DownloadEvent::StateChanged { state } => match state {
                EngineState::Requested => self,
                EngineState::InProgress => DownloadState::InProgress,
                EngineState::Completed => Self::completion(file_exists),
                EngineState::Cancelled => DownloadState::Cancelled,
                EngineState::Interrupted => DownloadState::Failed,
            },
            DownloadEvent::Finished => Self::completion(file_exists),
        }
    }

    fn completion(file_exists: bool) -> DownloadState {
        if file_exists {
            DownloadState::Finished
        } else {
            DownloadState::Cancelled
        }
    }

    /// Status text shown for the state
    pub fn label(&self) -> &'static str {
        match self {
            DownloadState::Waiting => "Waiting",
            DownloadState::InProgress => "In Progress",
            DownloadState::Paused => "Paused",
            DownloadState::Finished => "Completed",
            DownloadState::Failed => "Failed",
            DownloadState::Cancelled => "Cancelled",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadState::Waiting => "waiting",
            DownloadState::InProgress => "inprogress",
            DownloadState::Paused => "paused",
            DownloadState::Finished => "finished",
            DownloadState::Failed => "failed",
            DownloadState::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for DownloadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DownloadState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "waiting" => Ok(DownloadState::Waiting),
            "inprogress" => Ok(DownloadState::InProgress),
            "paused" => Ok(DownloadState::Paused),
            "finished" => Ok(DownloadState::Finished),
            "failed" => Ok(DownloadState::Failed),
            "cancelled" => Ok(DownloadState::Cancelled),
            _ => Err(format!("Unknown download state: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadRecord {
    pub id: String,
    /// Destination file; identifies the download for de-duplication
    pub path: PathBuf,
    pub url: String,
    pub folder: PathBuf,
    pub name: String,
    pub total_bytes: Option<u64>,
    pub received_bytes: u64,
    /// Human readable total size
    pub size: String,
    pub status: String,
    pub state: DownloadState,
    /// False once cancelled, failed or superseded
    pub valid: bool,
    pub created_at: DateTime<Utc>,
}

impl DownloadRecord {
    pub fn new(path: PathBuf, url: String, folder: PathBuf, name: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            path,
            url,
            folder,
            name,
            total_bytes: None,
            received_bytes: 0,
            size: format_size(0),
            status: DownloadState::Waiting.label().to_string(),
            state: DownloadState::Waiting,
            valid: true,
            created_at: Utc::now(),
        }
    }

    /// Apply an engine event. Returns true when the event was a state
    /// event (as opposed to progress) and was applied.
    pub fn apply(&mut self, event: &DownloadEvent, file_exists: bool) -> bool {
        let recheck = self.state == DownloadState::Finished && event.reports_completion();
        if self.state.is_terminal() && !recheck {
            return false;
        }

        if let DownloadEvent::Progress { received, total } = *event {
            if self.valid {
                self.received_bytes = received.max(0) as u64;
                self.total_bytes = (total > 0).then_some(total as u64);
                self.size = format_size(total);
                self.status = progress_status(received, total);
            }
            return false;
        }

        self.state = self.state.apply(event, file_exists);
        self.status = match event {
            DownloadEvent::PausedChanged { paused: false } => "Resuming".to_string(),
            _ => self.state.label().to_string(),
        };
        if matches!(self.state, DownloadState::Failed | DownloadState::Cancelled) {
            self.valid = false;
        }
        true
    }

    /// Progress as a percentage (0-100), when the size is known
    pub fn progress(&self) -> Option<f64> {
        match self.total_bytes {
            Some(total) if total > 0 => {
                Some((self.received_bytes as f64 / total as f64 * 100.0).min(100.0))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> DownloadRecord {
        DownloadRecord::new(
            PathBuf::from("/downloads/photos.zip"),
            "http://192.168.1.1:33455/download?file=photos.zip".to_string(),
            PathBuf::from("/downloads"),
            "photos.zip".to_string(),
        )
    }

    fn state_changed(state: EngineState) -> DownloadEvent {
        DownloadEvent::StateChanged { state }
    }

    #[test]
    fn test_new_record() {
        let record = record();
        assert_eq!(record.state, DownloadState::Waiting);
        assert_eq!(record.status, "Waiting");
        assert_eq!(record.size, "Unknown");
        assert!(record.valid);
        assert!(record.progress().is_none());
    }

    #[test]
    fn test_transitions() {
        use DownloadState::*;

        let in_progress = state_changed(EngineState::InProgress);
        assert_eq!(Waiting.apply(&in_progress, false), InProgress);
        assert_eq!(
            Waiting.apply(&state_changed(EngineState::Requested), false),
            Waiting
        );
        assert_eq!(
            InProgress.apply(&DownloadEvent::PausedChanged { paused: true }, false),
            Paused
        );
        assert_eq!(
            Paused.apply(&DownloadEvent::PausedChanged { paused: false }, false),
            InProgress
        );
        assert_eq!(
            InProgress.apply(&state_changed(EngineState::Cancelled), false),
            Cancelled
        );
        assert_eq!(
            Paused.apply(&state_changed(EngineState::Interrupted), false),
            Failed
        );
        assert_eq!(
            InProgress.apply(&DownloadEvent::Progress { received: 1, total: 2 }, false),
            InProgress
        );
    }

    #[test]
    fn test_completion_requires_file() {
        use DownloadState::*;

        for state in [Waiting, InProgress, Paused] {
            let completed = state_changed(EngineState::Completed);
            assert_eq!(state.apply(&completed, true), Finished);
            assert_eq!(state.apply(&completed, false), Cancelled);
            assert_eq!(state.apply(&DownloadEvent::Finished, true), Finished);
            assert_eq!(state.apply(&DownloadEvent::Finished, false), Cancelled);
        }
    }

    #[test]
    fn test_terminal_states_stay() {
        use DownloadState::*;

        for state in [Finished, Failed, Cancelled] {
            assert!(state.is_terminal());
            assert_eq!(state.apply(&state_changed(EngineState::InProgress), true), state);
            assert_eq!(state.apply(&DownloadEvent::Finished, true), state);
        }
    }

    #[test]
    fn test_finished_rechecks_file_on_completion() {
        use DownloadState::*;

        let completed = state_changed(EngineState::Completed);
        assert_eq!(Finished.apply(&completed, true), Finished);
        assert_eq!(Finished.apply(&completed, false), Cancelled);
        assert_eq!(Finished.apply(&DownloadEvent::Finished, false), Cancelled);

        for state in [Failed, Cancelled] {
            assert_eq!(state.apply(&completed, true), state);
            assert_eq!(state.apply(&DownloadEvent::Finished, true), state);
        }
    }

    #[test]
    fn test_file_gone_before_second_completion() {
        let mut record = record();
        assert!(record.apply(&state_changed(EngineState::Completed), true));
        assert_eq!(record.state, DownloadState::Finished);
        assert!(record.valid);

        assert!(record.apply(&DownloadEvent::Finished, false));
        assert_eq!(record.state, DownloadState::Cancelled);
        assert_eq!(record.status, "Cancelled");
        assert!(!record.valid);
    }

    #[test]
    fn test_progress_updates_status_and_size() {
        let mut record = record();
        let applied = record.apply(
            &DownloadEvent::Progress {
                received: 50,
                total: 200,
            },
            false,
        );

        assert!(!applied);
        assert!(record.status.contains("25%"));
        assert_eq!(record.size, "200 B");
        assert_eq!(record.total_bytes, Some(200));
        assert!((record.progress().unwrap() - 25.0).abs() < 0.01);

        record.apply(
            &DownloadEvent::Progress {
                received: 4_000,
                total: -1,
            },
            false,
        );
        assert_eq!(record.status, "In Progress");
        assert_eq!(record.size, "Unknown");
        assert!(record.total_bytes.is_none());
    }

    #[test]
    fn test_pause_and_resume_status() {
        let mut record = record();
        record.apply(&state_changed(EngineState::InProgress), false);

        assert!(record.apply(&DownloadEvent::PausedChanged { paused: true }, false));
        assert_eq!(record.state, DownloadState::Paused);
        assert_eq!(record.status, "Paused");

        record.apply(&DownloadEvent::PausedChanged { paused: false }, false);
        assert_eq!(record.state, DownloadState::InProgress);
        assert_eq!(record.status, "Resuming");

        record.apply(
            &DownloadEvent::Progress {
                received: 10,
                total: 100,
            },
            false,
        );
        assert_eq!(record.status, "In Progress (10%)");
    }

    #[test]
    fn test_missing_file_is_cancelled_and_invalid() {
        let mut record = record();
        record.apply(&state_changed(EngineState::Completed), false);

        assert_eq!(record.state, DownloadState::Cancelled);
        assert_eq!(record.status, "Cancelled");
        assert!(!record.valid);

        let applied = record.apply(
            &DownloadEvent::Progress {
                received: 10,
                total: 100,
            },
            false,
        );
        assert!(!applied);
        assert_eq!(record.status, "Cancelled");
    }

    #[test]
    fn test_failure_invalidates() {
        let mut record = record();
        record.apply(&state_changed(EngineState::Interrupted), false);
        assert_eq!(record.state, DownloadState::Failed);
        assert_eq!(record.status, "Failed");
        assert!(!record.valid);
    }

    #[test]
    fn test_state_parse() {
        assert_eq!(
            "InProgress".parse::<DownloadState>().unwrap(),
            DownloadState::InProgress
        );
        assert!("done".parse::<DownloadState>().is_err());
    }
}
