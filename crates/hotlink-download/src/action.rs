//! Per-download action menu

use serde::{Deserialize, Serialize};

use crate::record::{DownloadRecord, DownloadState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadAction {
    Pause,
    Resume,
    Cancel,
    /// Re-issue the source URL as a new navigation
    Retry,
    /// Drop the record; no engine call
    Remove,
    /// Open the downloaded file
    Open,
    /// Show the file in the system file manager
    Reveal,
}

impl DownloadAction {
    pub fn label(&self) -> &'static str {
        match self {
            DownloadAction::Pause => "Pause",
            DownloadAction::Resume => "Resume",
            DownloadAction::Cancel => "Cancel",
            DownloadAction::Retry => "Retry",
            DownloadAction::Remove => "Remove",
            DownloadAction::Open => "Open",
            DownloadAction::Reveal => "Show in Folder",
        }
    }
}

/// Actions offered for one download in its current state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMenu {
    pub download_id: String,
    pub primary: DownloadAction,
    pub secondary: DownloadAction,
}

impl ActionMenu {
    pub fn for_record(record: &DownloadRecord) -> Self {
        let (primary, secondary) = match record.state {
            _ if !record.valid => (DownloadAction::Retry, DownloadAction::Remove),
            DownloadState::Waiting | DownloadState::InProgress => {
                (DownloadAction::Pause, DownloadAction::Cancel)
            }
            DownloadState::Paused => (DownloadAction::Resume, DownloadAction::Cancel),
            DownloadState::Finished => (DownloadAction::Open, DownloadAction::Remove),
            DownloadState::Failed | DownloadState::Cancelled => {
                (DownloadAction::Retry, DownloadAction::Remove)
            }
        };

        Self {
            download_id: record.id.clone(),
            primary,
            secondary,
        }
    }

    pub fn actions(&self) -> [DownloadAction; 3] {
        [self.primary, self.secondary, DownloadAction::Reveal]
    }

    pub fn offers(&self, action: DownloadAction) -> bool {
        self.actions().contains(&action)
    }
}
