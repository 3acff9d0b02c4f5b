//! Host link opening.

use async_trait::async_trait;
use prospect_core::{traits::LinkOpener, ProspectError};
use tokio::process::Command;
use tracing::debug;

/// Opens links through the platform's URL handler.
pub struct SystemOpener;

#[async_trait]
impl LinkOpener for SystemOpener {
    async fn open(&self, url: &str) -> Result<(), ProspectError> {
        let mut cmd = open_command(url);
        debug!("opening {url}");
        let status = cmd.status().await?;
        if !status.success() {
            return Err(std::io::Error::other(format!("opener exited with {status}")).into());
        }
        Ok(())
    }
}

#[cfg(target_os = "macos")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(url);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn open_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Whether this host can open browser windows at all.
///
/// macOS and Windows always can; on Linux it depends on a display
/// server being present.
pub fn graphical_session_available() -> bool {
    if cfg!(any(target_os = "macos", target_os = "windows")) {
        return true;
    }
    std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some()
}
