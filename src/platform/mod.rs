//! Platform abstraction layer for the desktop collaborators.
//!
//! This module provides trait-based seams for everything protonbar does not
//! own: running external processes, asking the window manager about the VPN
//! front end, and presenting the action menu. Linux implementations live in
//! [`linux`] and are selected at compile time.
//!
//! Supported platforms:
//! - Linux: sway (`swaymsg`) and bemenu

#[cfg(target_os = "linux")]
pub mod linux;

#[cfg(not(target_os = "linux"))]
compile_error!("protonbar currently only supports Linux (sway)");

use std::io;

/// Captured result of a finished process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the process exited with status 0.
    pub success: bool,
    /// Exit code, `None` when killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Process execution.
///
/// Blocks until the child exits. There is no timeout.
pub trait CommandRunner {
    /// Run `program` with `args`, optionally feeding `stdin`.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or waited on.
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> io::Result<CommandOutput>;
}

/// Window presence and focus for the VPN front end.
pub trait WindowManager {
    /// Whether a window belonging to `app_id` is currently open.
    fn is_app_running(&self, app_id: &str) -> bool;

    /// Bring the window belonging to `app_id` to the front.
    fn focus_app(&self, app_id: &str);
}

/// Interactive single-choice menu.
pub trait MenuPresenter {
    /// Show `labels` in order and block until the user picks one.
    ///
    /// Returns `None` when the menu was dismissed.
    fn select(&self, labels: &[&str], prompt: &str) -> Option<String>;
}
