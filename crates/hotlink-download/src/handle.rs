//! Browser engine download handle

use std::path::PathBuf;

/// Engine-side handle of one download. The engine discards a download
/// unless `accept` is called.
pub trait DownloadHandle: Send {
    fn path(&self) -> PathBuf;
    fn url(&self) -> String;
    fn download_directory(&self) -> PathBuf;
    fn file_name(&self) -> String;

    fn accept(&mut self);
    fn pause(&mut self);
    fn resume(&mut self);
    fn cancel(&mut self);
}
