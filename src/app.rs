//! Application wiring.
//!
//! [`App`] turns the loaded configuration into the concrete Linux collaborators
//! (process runner, sway, bemenu) and runs one controller session against the
//! status file.

use std::path::PathBuf;

use crate::config::AppConfig;
use crate::core::dispatcher::Dispatcher;
use crate::core::session::{Outcome, Session, SessionError};
use crate::core::store::StatusStore;
use crate::logger::{self, LogLevel};
use crate::platform::linux::bemenu::Bemenu;
use crate::platform::linux::process::SystemRunner;
use crate::platform::linux::sway::SwayWindows;
use crate::utils;
use crate::vpn::{ActionCatalog, VpnCli};

/// One invocation of protonbar.
pub struct App {
    config: AppConfig,
    catalog: ActionCatalog,
    store: StatusStore,
}

impl App {
    /// Validates the menu and binds the status file.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured menu actions are unusable.
    pub fn new(config: AppConfig, status_path: PathBuf) -> color_eyre::Result<Self> {
        let catalog = config.catalog()?;
        Ok(Self {
            config,
            catalog,
            store: StatusStore::new(status_path),
        })
    }

    /// Runs the controller once against the real system.
    ///
    /// # Errors
    ///
    /// Returns an error if the status file cannot be read or written.
    pub fn run(&self) -> Result<Outcome, SessionError> {
        let runner = SystemRunner;
        let cli = VpnCli::new(
            &runner,
            self.config.vpn_binary.as_str(),
            self.config.privilege_command.as_str(),
            self.config.privilege_args.clone(),
        );
        let dispatcher = Dispatcher::new(&cli, &self.store, &self.catalog);
        let windows = SwayWindows::new(&runner, self.config.window_manager_command.as_str());
        let menu = Bemenu::new(
            &runner,
            self.config.menu_command.as_str(),
            self.config.menu_args.clone(),
        );

        let binary_available = match utils::find_executable(cli.binary()) {
            Some(path) => {
                logger::log(
                    LogLevel::Debug,
                    "APP",
                    format!("Using VPN client at {}", path.display()),
                );
                true
            }
            None => false,
        };

        logger::log(
            LogLevel::Debug,
            "APP",
            format!("Status file {}", self.store.path().display()),
        );

        let session = Session {
            store: &self.store,
            dispatcher: &dispatcher,
            catalog: &self.catalog,
            windows: &windows,
            menu: &menu,
            binary_available,
            window_app_id: &self.config.window_app_id,
            menu_prompt: &self.config.menu_prompt,
        };

        let outcome = session.run()?;
        logger::log(LogLevel::Debug, "APP", format!("Run finished: {outcome:?}"));
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::core::codec;
    use crate::state::StatusRecord;
    use crate::vpn::MenuAction;

    #[test]
    fn test_missing_binary_reports_error_status() {
        let dir = tempfile::tempdir().unwrap();
        let status_path = dir.path().join("vpn_status");
        let config = AppConfig {
            vpn_binary: "protonbar-test-no-such-binary".to_string(),
            ..AppConfig::default()
        };

        let app = App::new(config, status_path.clone()).unwrap();
        assert_eq!(app.run().unwrap(), Outcome::BinaryMissing);
        assert_eq!(
            std::fs::read_to_string(status_path).unwrap(),
            codec::encode(&StatusRecord::error(constants::MSG_BINARY_MISSING))
        );
    }

    #[test]
    fn test_invalid_menu_is_rejected() {
        let config = AppConfig {
            connect_actions: vec![MenuAction::new("", "connect -f")],
            ..AppConfig::default()
        };

        assert!(App::new(config, PathBuf::from("/tmp/unused")).is_err());
    }
}
