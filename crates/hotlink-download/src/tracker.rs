//! Download tracker
//!
//! Owns every download record of the current session together with the
//! engine handle it is bound to. Runs on the main loop only.

use std::path::Path;

use crate::action::ActionMenu;
use crate::error::DownloadError;
use crate::event::DownloadEvent;
use crate::handle::DownloadHandle;
use crate::record::{DownloadRecord, DownloadState};
use crate::Result;

struct TrackedDownload {
    record: DownloadRecord,
    handle: Box<dyn DownloadHandle>,
}

/// Result of applying an engine event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    pub state: DownloadState,
    /// Any open action menu is stale and should be hidden
    pub hide_menu: bool,
}

#[derive(Default)]
pub struct DownloadTracker {
    downloads: Vec<TrackedDownload>,
}

impl DownloadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a download the engine just requested. Any earlier
    /// record for the same destination is invalidated and dropped first.
    pub fn on_download_requested(&mut self, mut handle: Box<dyn DownloadHandle>) -> String {
        let path = handle.path();

        self.downloads.retain_mut(|tracked| {
            if tracked.record.path != path {
                return true;
            }
            tracked.record.valid = false;
            tracing::info!(
                download_id = %tracked.record.id,
                path = %path.display(),
                "Dropping download superseded by a new request"
            );
            false
        });

        handle.accept();

        let record = DownloadRecord::new(
            path,
            handle.url(),
            handle.download_directory(),
            handle.file_name(),
        );
        let id = record.id.clone();

        tracing::info!(
            download_id = %id,
            url = %record.url,
            path = %record.path.display(),
            "Tracking new download"
        );

        self.downloads.push(TrackedDownload { record, handle });
        id
    }

    /// Apply an engine event to a record
    pub fn handle_event(&mut self, id: &str, event: DownloadEvent) -> Result<EventOutcome> {
        let tracked = self.tracked_mut(id)?;
        let record = &mut tracked.record;

        let file_exists = event.reports_completion() && record.path.is_file();
        let previous = record.state;
        let hide_menu = record.apply(&event, file_exists);

        if previous != record.state {
            tracing::debug!(
                download_id = %id,
                from = %previous,
                to = %record.state,
                "Download state transition"
            );
            match record.state {
                DownloadState::Finished => {
                    tracing::info!(download_id = %id, path = %record.path.display(), "Download completed")
                }
                DownloadState::Cancelled if event.reports_completion() => tracing::warn!(
                    download_id = %id,
                    path = %record.path.display(),
                    "Download reported complete but the file is missing"
                ),
                DownloadState::Failed => tracing::warn!(download_id = %id, "Download failed"),
                _ => {}
            }
        }

        Ok(EventOutcome {
            state: record.state,
            hide_menu,
        })
    }

    pub fn pause(&mut self, id: &str) -> Result<()> {
        self.tracked_mut(id)?.handle.pause();
        tracing::info!(download_id = %id, "Pausing download");
        Ok(())
    }

    pub fn resume(&mut self, id: &str) -> Result<()> {
        self.tracked_mut(id)?.handle.resume();
        tracing::info!(download_id = %id, "Resuming download");
        Ok(())
    }

    pub fn cancel(&mut self, id: &str) -> Result<()> {
        self.tracked_mut(id)?.handle.cancel();
        tracing::info!(download_id = %id, "Cancelling download");
        Ok(())
    }

    /// Stop tracking a record. The engine is not told.
    pub fn remove(&mut self, id: &str) -> Result<DownloadRecord> {
        let index = self.index_of(id)?;
        let tracked = self.downloads.remove(index);
        tracing::info!(download_id = %id, "Removed download");
        Ok(tracked.record)
    }

    /// URL to navigate to for a retry. The record itself goes away when the
    /// engine requests the same destination again.
    pub fn retry(&self, id: &str) -> Result<String> {
        let record = self.get(id)?;
        tracing::info!(download_id = %id, url = %record.url, "Retrying download");
        Ok(record.url.clone())
    }

    /// Cancel every download and forget all records. Returns how many
    /// records were dropped.
    pub fn clear_session(&mut self) -> usize {
        for tracked in &mut self.downloads {
            tracked.handle.cancel();
        }
        let count = self.downloads.len();
        self.downloads.clear();

        if count > 0 {
            tracing::info!(count, "Cleared session downloads");
        }
        count
    }

    pub fn get(&self, id: &str) -> Result<&DownloadRecord> {
        self.downloads
            .iter()
            .find(|tracked| tracked.record.id == id)
            .map(|tracked| &tracked.record)
            .ok_or_else(|| DownloadError::NotFound(id.to_string()))
    }

    pub fn actions(&self, id: &str) -> Result<ActionMenu> {
        Ok(ActionMenu::for_record(self.get(id)?))
    }

    /// The valid record for a destination, if any
    pub fn valid_record_for_path(&self, path: &Path) -> Option<&DownloadRecord> {
        self.records()
            .find(|record| record.valid && record.path == path)
    }

    /// Records in request order
    pub fn records(&self) -> impl Iterator<Item = &DownloadRecord> {
        self.downloads.iter().map(|tracked| &tracked.record)
    }

    /// Downloads still transferring
    pub fn active(&self) -> impl Iterator<Item = &DownloadRecord> {
        self.records().filter(|record| !record.state.is_terminal())
    }

    pub fn len(&self) -> usize {
        self.downloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.downloads.is_empty()
    }

    /// Records as JSON for the download list view
    pub fn to_json(&self) -> Result<String> {
        let records: Vec<&DownloadRecord> = self.records().collect();
        Ok(serde_json::to_string(&records)?)
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.downloads
            .iter()
            .position(|tracked| tracked.record.id == id)
            .ok_or_else(|| DownloadError::NotFound(id.to_string()))
    }

    fn tracked_mut(&mut self, id: &str) -> Result<&mut TrackedDownload> {
        self.downloads
            .iter_mut()
            .find(|tracked| tracked.record.id == id)
            .ok_or_else(|| DownloadError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EngineState;
    use parking_lot::Mutex;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tempfile::{tempdir, NamedTempFile};

    #[derive(Clone)]
    struct FakeHandle {
        path: PathBuf,
        url: String,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl FakeHandle {
        fn new(path: impl Into<PathBuf>, calls: &Arc<Mutex<Vec<String>>>) -> Self {
            Self {
                path: path.into(),
                url: "http://192.168.1.1:33455/download/1".to_string(),
                calls: Arc::clone(calls),
            }
        }

        fn log(&self, call: &str) {
            self.calls
                .lock()
                .push(format!("{} {}", call, self.path.display()));
        }
    }

    impl DownloadHandle for FakeHandle {
        fn path(&self) -> PathBuf {
            self.path.clone()
        }

        fn url(&self) -> String {
            self.url.clone()
        }

        fn download_directory(&self) -> PathBuf {
            self.path.parent().map(Path::to_path_buf).unwrap_or_default()
        }

        fn file_name(&self) -> String {
            self.path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default()
        }

        fn accept(&mut self) {
            self.log("accept");
        }

        fn pause(&mut self) {
            self.log("pause");
        }

        fn resume(&mut self) {
            self.log("resume");
        }

        fn cancel(&mut self) {
            self.log("cancel");
        }
    }

    fn calls() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn completed() -> DownloadEvent {
        DownloadEvent::StateChanged {
            state: EngineState::Completed,
        }
    }

    #[test]
    fn test_request_accepts_and_tracks() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();

        let id = tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));

        let record = tracker.get(&id).unwrap();
        assert_eq!(record.state, DownloadState::Waiting);
        assert_eq!(record.name, "a.pdf");
        assert_eq!(record.folder, PathBuf::from("/dl"));
        assert_eq!(calls.lock().as_slice(), ["accept /dl/a.pdf"]);
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_same_path_request_replaces_record() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();

        let first = tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));
        tracker
            .handle_event(
                &first,
                DownloadEvent::StateChanged {
                    state: EngineState::Interrupted,
                },
            )
            .unwrap();
        let other = tracker.on_download_requested(Box::new(FakeHandle::new("/dl/b.pdf", &calls)));

        for _ in 0..3 {
            tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));
            let valid_for_path = tracker
                .records()
                .filter(|r| r.valid && r.path == Path::new("/dl/a.pdf"))
                .count();
            assert_eq!(valid_for_path, 1);
        }

        assert!(tracker.get(&first).is_err());
        assert!(tracker.get(&other).is_ok());
        assert_eq!(tracker.len(), 2);
        assert!(tracker
            .valid_record_for_path(Path::new("/dl/a.pdf"))
            .is_some());
    }

    #[test]
    fn test_completion_checks_file_on_disk() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        let dir = tempdir().unwrap();
        let present = dir.path().join("present.bin");
        std::fs::write(&present, b"payload").unwrap();
        let missing = dir.path().join("missing.bin");

        let kept = tracker.on_download_requested(Box::new(FakeHandle::new(&present, &calls)));
        let lost = tracker.on_download_requested(Box::new(FakeHandle::new(&missing, &calls)));
        assert_eq!(tracker.active().count(), 2);

        let outcome = tracker.handle_event(&kept, completed()).unwrap();
        assert_eq!(outcome.state, DownloadState::Finished);
        assert!(outcome.hide_menu);
        assert_eq!(tracker.get(&kept).unwrap().status, "Completed");

        let outcome = tracker.handle_event(&lost, DownloadEvent::Finished).unwrap();
        assert_eq!(outcome.state, DownloadState::Cancelled);
        assert!(!tracker.get(&lost).unwrap().valid);
        assert_eq!(tracker.active().count(), 0);
    }

    #[test]
    fn test_second_completion_finds_file_deleted() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();
        let id = tracker.on_download_requested(Box::new(FakeHandle::new(&path, &calls)));

        let outcome = tracker.handle_event(&id, completed()).unwrap();
        assert_eq!(outcome.state, DownloadState::Finished);
        assert_eq!(
            tracker.actions(&id).unwrap().primary,
            crate::DownloadAction::Open
        );

        file.close().unwrap();
        let outcome = tracker.handle_event(&id, DownloadEvent::Finished).unwrap();

        assert_eq!(outcome.state, DownloadState::Cancelled);
        assert!(outcome.hide_menu);
        let record = tracker.get(&id).unwrap();
        assert_eq!(record.status, "Cancelled");
        assert!(!record.valid);
        assert!(tracker.valid_record_for_path(&path).is_none());
        assert_eq!(
            tracker.actions(&id).unwrap().primary,
            crate::DownloadAction::Retry
        );
    }

    #[test]
    fn test_second_completion_keeps_present_file_finished() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        let file = NamedTempFile::new().unwrap();
        let id = tracker.on_download_requested(Box::new(FakeHandle::new(file.path(), &calls)));

        tracker.handle_event(&id, completed()).unwrap();
        let outcome = tracker.handle_event(&id, DownloadEvent::Finished).unwrap();

        assert_eq!(outcome.state, DownloadState::Finished);
        assert!(tracker.get(&id).unwrap().valid);
    }

    #[test]
    fn test_progress_does_not_hide_menu() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        let id = tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));

        let outcome = tracker
            .handle_event(
                &id,
                DownloadEvent::Progress {
                    received: 50,
                    total: 200,
                },
            )
            .unwrap();

        assert!(!outcome.hide_menu);
        assert!(tracker.get(&id).unwrap().status.contains("25%"));
    }

    #[test]
    fn test_commands_forward_to_engine() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        let id = tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));

        tracker.pause(&id).unwrap();
        tracker.resume(&id).unwrap();
        tracker.cancel(&id).unwrap();

        assert_eq!(
            calls.lock().as_slice(),
            [
                "accept /dl/a.pdf",
                "pause /dl/a.pdf",
                "resume /dl/a.pdf",
                "cancel /dl/a.pdf"
            ]
        );
        assert!(matches!(
            tracker.pause("missing"),
            Err(DownloadError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_makes_no_engine_call() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        let id = tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));

        let removed = tracker.remove(&id).unwrap();

        assert_eq!(removed.id, id);
        assert!(tracker.is_empty());
        assert!(tracker.get(&id).is_err());
        assert_eq!(calls.lock().len(), 1);
    }

    #[test]
    fn test_retry_returns_source_url() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        let id = tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));
        tracker
            .handle_event(
                &id,
                DownloadEvent::StateChanged {
                    state: EngineState::Cancelled,
                },
            )
            .unwrap();

        assert_eq!(
            tracker.retry(&id).unwrap(),
            "http://192.168.1.1:33455/download/1"
        );
        assert_eq!(tracker.actions(&id).unwrap().primary, crate::DownloadAction::Retry);
    }

    #[test]
    fn test_clear_session_cancels_everything() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));
        tracker.on_download_requested(Box::new(FakeHandle::new("/dl/b.pdf", &calls)));

        assert_eq!(tracker.clear_session(), 2);
        assert!(tracker.is_empty());
        assert_eq!(
            calls
                .lock()
                .iter()
                .filter(|call| call.starts_with("cancel"))
                .count(),
            2
        );
    }

    #[test]
    fn test_to_json() {
        let calls = calls();
        let mut tracker = DownloadTracker::new();
        tracker.on_download_requested(Box::new(FakeHandle::new("/dl/a.pdf", &calls)));

        let json: serde_json::Value = serde_json::from_str(&tracker.to_json().unwrap()).unwrap();
        assert_eq!(json[0]["state"], "waiting");
        assert_eq!(json[0]["name"], "a.pdf");
    }
}
