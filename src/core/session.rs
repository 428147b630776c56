//! One status-bar click, start to finish.
//!
//! ```text
//! binary missing ──────────────► persist Error            (BinaryMissing)
//! front end window open ───────► focus it                 (Focused)
//! persisted state is Working ──► nothing                  (Busy)
//! otherwise ───────────────────► menu ─► no choice        (Dismissed)
//!                                       ├► not offered    (UnknownChoice)
//!                                       └► dispatch       (Dispatched)
//! ```

use std::fmt;

use crate::constants;
use crate::core::dispatcher::{DispatchError, Dispatcher};
use crate::core::store::{StatusStore, StoreError};
use crate::logger::{self, LogLevel};
use crate::platform::{MenuPresenter, WindowManager};
use crate::state::{CanonicalState, StatusRecord};
use crate::vpn::ActionCatalog;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The VPN client is not installed; `Error` was persisted.
    BinaryMissing,
    /// The front end was already open and has been focused.
    Focused,
    /// An action is already in flight; nothing was done.
    Busy,
    /// The menu was dismissed; nothing was written.
    Dismissed,
    /// The menu returned text that is not an offered label; nothing was written.
    UnknownChoice(String),
    /// An action ran and this record was persisted.
    Dispatched(StatusRecord),
}

/// Everything a run talks to.
pub struct Session<'a> {
    pub store: &'a StatusStore,
    pub dispatcher: &'a Dispatcher<'a>,
    pub catalog: &'a ActionCatalog,
    pub windows: &'a dyn WindowManager,
    pub menu: &'a dyn MenuPresenter,
    /// Whether the VPN client binary was found on this host.
    pub binary_available: bool,
    pub window_app_id: &'a str,
    pub menu_prompt: &'a str,
}

impl Session<'_> {
    /// Runs the controller once.
    ///
    /// # Errors
    ///
    /// Returns an error only when the status file cannot be read or written.
    /// Failed VPN commands are persisted, not returned.
    pub fn run(&self) -> Result<Outcome, SessionError> {
        if !self.binary_available {
            logger::log(
                LogLevel::Error,
                "SESSION",
                "VPN client not found, reporting error status",
            );
            self.store
                .write(&StatusRecord::error(constants::MSG_BINARY_MISSING))?;
            return Ok(Outcome::BinaryMissing);
        }

        if self.windows.is_app_running(self.window_app_id) {
            logger::log(
                LogLevel::Info,
                "SESSION",
                format!("'{}' already open, focusing it", self.window_app_id),
            );
            self.windows.focus_app(self.window_app_id);
            return Ok(Outcome::Focused);
        }

        let state = self.store.read(self.dispatcher)?;
        if state == CanonicalState::Working {
            logger::log(
                LogLevel::Info,
                "SESSION",
                "An action is already in progress, ignoring click",
            );
            return Ok(Outcome::Busy);
        }

        let labels = self.catalog.offered_labels(state);
        logger::log(
            LogLevel::Debug,
            "SESSION",
            format!("State {state}, offering {} action(s)", labels.len()),
        );

        let Some(choice) = self.menu.select(&labels, self.menu_prompt) else {
            logger::log(LogLevel::Debug, "SESSION", "Menu dismissed");
            return Ok(Outcome::Dismissed);
        };

        if !labels.contains(&choice.as_str()) {
            logger::log(
                LogLevel::Warning,
                "SESSION",
                format!("Ignoring '{choice}', not offered while {state}"),
            );
            return Ok(Outcome::UnknownChoice(choice));
        }

        match self.dispatcher.dispatch(&choice) {
            Ok(record) => Ok(Outcome::Dispatched(record)),
            Err(DispatchError::UnknownAction(label)) => {
                logger::log(
                    LogLevel::Warning,
                    "SESSION",
                    format!("Ignoring unknown menu choice '{label}'"),
                );
                Ok(Outcome::UnknownChoice(label))
            }
            Err(DispatchError::Store(e)) => Err(e.into()),
        }
    }
}

/// A run could not complete: the status file is unusable.
#[derive(Debug)]
pub struct SessionError(StoreError);

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl From<StoreError> for SessionError {
    fn from(e: StoreError) -> Self {
        Self(e)
    }
}
