//! System file opener
//!
//! Opens downloaded files and shows them in the platform file manager.

use std::io;
use std::path::Path;
use std::process::Command;

pub trait SystemOpener: Send {
    /// Open a file with its default application
    fn open(&self, path: &Path) -> io::Result<()>;
    /// Show a file selected in the file manager
    fn reveal(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformOpener;

impl SystemOpener for PlatformOpener {
    fn open(&self, path: &Path) -> io::Result<()> {
        tracing::info!(path = %path.display(), "Opening file");
        open_command(path).spawn().map(|_| ())
    }

    fn reveal(&self, path: &Path) -> io::Result<()> {
        tracing::info!(path = %path.display(), "Revealing file");
        reveal_command(path).spawn().map(|_| ())
    }
}

#[cfg(target_os = "windows")]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Command {
    let path = path.display().to_string().replace('/', "\\");
    let mut cmd = Command::new("explorer");
    cmd.arg(format!("/select,{}", path));
    cmd
}

#[cfg(target_os = "macos")]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg("-R").arg(path);
    cmd
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn open_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

// xdg-open cannot select a file, so the containing folder is opened
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn reveal_command(path: &Path) -> Command {
    let folder = path.parent().unwrap_or(path);
    let mut cmd = Command::new("xdg-open");
    cmd.arg(folder);
    cmd
}
