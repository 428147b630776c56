//! Menu action execution.
//!
//! A chosen label is resolved against the catalog, `Working` is persisted,
//! the subcommand runs through the privilege wrapper and its output is
//! classified and persisted.

use std::fmt;

use crate::constants;
use crate::core::classifier;
use crate::core::store::{StatusSource, StatusStore, StoreError};
use crate::logger::{self, LogLevel};
use crate::state::StatusRecord;
use crate::vpn::{ActionCatalog, MenuAction, VpnCli};

pub struct Dispatcher<'a> {
    cli: &'a VpnCli<'a>,
    store: &'a StatusStore,
    catalog: &'a ActionCatalog,
}

impl<'a> Dispatcher<'a> {
    pub fn new(cli: &'a VpnCli<'a>, store: &'a StatusStore, catalog: &'a ActionCatalog) -> Self {
        Self {
            cli,
            store,
            catalog,
        }
    }

    /// Looks up the action behind a menu label.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::UnknownAction`] if no action carries `label`.
    pub fn resolve(&self, label: &str) -> Result<&'a MenuAction, DispatchError> {
        self.catalog
            .resolve(label)
            .ok_or_else(|| DispatchError::UnknownAction(label.to_string()))
    }

    /// Runs the action behind `label` and persists the resulting state.
    ///
    /// An unknown label writes nothing. Command failures are not errors: they
    /// are persisted as `Error` with the generic message.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown label or if the final status write fails.
    pub fn dispatch(&self, label: &str) -> Result<StatusRecord, DispatchError> {
        let action = self.resolve(label)?;
        logger::log(
            LogLevel::Info,
            "ACTION",
            format!("'{}' -> {}", action.label, action.command),
        );

        // Best effort: the bar flashes Working even if the command fails fast.
        if let Err(e) = self.store.write(&StatusRecord::working()) {
            logger::log(
                LogLevel::Warning,
                "ACTION",
                format!("Could not mark status as working: {e}"),
            );
        }

        let record = match self.cli.execute(&action.command) {
            Ok(output) => self.classify_output(&output),
            Err(e) => {
                logger::log(
                    LogLevel::Error,
                    "ACTION",
                    format!("'{}' failed: {e}", action.label),
                );
                StatusRecord::error(constants::MSG_GENERIC_ERROR)
            }
        };

        self.store.write(&record)?;
        logger::log(
            LogLevel::Info,
            "ACTION",
            format!("Status is now {} '{}'", record.state, record.detail),
        );
        Ok(record)
    }

    /// Classifies command output, probing `status` first when the command
    /// printed nothing.
    pub fn classify_output(&self, output: &str) -> StatusRecord {
        if output.is_empty() {
            return self.current_status();
        }
        classifier::classify(output)
    }
}

impl StatusSource for Dispatcher<'_> {
    /// Probe and classify. A failed probe is an `Error` with no detail.
    fn current_status(&self) -> StatusRecord {
        match self.cli.probe_status() {
            Ok(output) => classifier::classify(&output),
            Err(e) => {
                logger::log(
                    LogLevel::Warning,
                    "ACTION",
                    format!("Status probe failed: {e}"),
                );
                StatusRecord::error("")
            }
        }
    }
}

#[derive(Debug)]
pub enum DispatchError {
    /// No catalog action carries this label.
    UnknownAction(String),
    /// The final status could not be persisted.
    Store(StoreError),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAction(label) => write!(f, "no menu action named '{label}'"),
            Self::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownAction(_) => None,
            Self::Store(e) => Some(e),
        }
    }
}

impl From<StoreError> for DispatchError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::codec;
    use crate::platform::testing::FakeRunner;
    use crate::platform::{CommandOutput, CommandRunner};
    use crate::state::CanonicalState;
    use std::cell::RefCell;
    use std::fs;
    use std::io;
    use std::path::PathBuf;

    fn catalog() -> ActionCatalog {
        ActionCatalog::new(
            vec![
                MenuAction::new("Le plus rapide", "connect -f"),
                MenuAction::new("Japon", "connect --cc jp"),
            ],
            vec![MenuAction::new("Déconnecter", "disconnect")],
        )
        .unwrap()
    }

    struct Fixture {
        _dir: tempfile::TempDir,
        store: StatusStore,
        catalog: ActionCatalog,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status"));
        Fixture {
            _dir: dir,
            store,
            catalog: catalog(),
        }
    }

    fn persisted(store: &StatusStore) -> String {
        fs::read_to_string(store.path()).unwrap()
    }

    #[test]
    fn test_success_persists_classified_output() {
        let fx = fixture();
        let runner = FakeRunner::new();
        runner.push_ok("Connecting to JP#5 via UDP...\nConnected!\n");
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        let record = dispatcher.dispatch("Japon").unwrap();

        assert_eq!(record, StatusRecord::connected("JP#5"));
        assert_eq!(persisted(&fx.store), codec::encode(&record));
        assert_eq!(
            runner.calls(),
            vec![vec!["sudo", "protonvpn", "connect", "--cc", "jp"]]
        );
    }

    #[test]
    fn test_failure_persists_generic_error() {
        let fx = fixture();
        let runner = FakeRunner::new();
        runner.push_failure(1, "sudo: a password is required\n");
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        let record = dispatcher.dispatch("Le plus rapide").unwrap();

        let expected = StatusRecord::error(constants::MSG_GENERIC_ERROR);
        assert_eq!(record, expected);
        assert_eq!(persisted(&fx.store), codec::encode(&expected));
        assert!(!persisted(&fx.store).contains("password"));
    }

    #[test]
    fn test_launch_failure_persists_generic_error() {
        let fx = fixture();
        let runner = FakeRunner::new();
        runner.push_spawn_error();
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        dispatcher.dispatch("Déconnecter").unwrap();

        assert_eq!(
            codec::decode(persisted(&fx.store).as_bytes()).unwrap(),
            CanonicalState::Error
        );
    }

    /// Records what the status file held at the moment each command ran.
    struct SnoopingRunner {
        path: PathBuf,
        seen: RefCell<Vec<String>>,
    }

    impl CommandRunner for SnoopingRunner {
        fn run(&self, _: &str, _: &[String], _: Option<&str>) -> io::Result<CommandOutput> {
            self.seen
                .borrow_mut()
                .push(fs::read_to_string(&self.path).unwrap_or_default());
            Ok(CommandOutput {
                success: false,
                code: Some(1),
                ..CommandOutput::default()
            })
        }
    }

    #[test]
    fn test_working_is_written_before_execution() {
        let fx = fixture();
        fx.store.write(&StatusRecord::connected("JP#1")).unwrap();
        let runner = SnoopingRunner {
            path: fx.store.path().to_path_buf(),
            seen: RefCell::new(Vec::new()),
        };
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        dispatcher.dispatch("Déconnecter").unwrap();

        assert_eq!(
            runner.seen.borrow().as_slice(),
            [codec::encode(&StatusRecord::working())]
        );
        assert_eq!(
            persisted(&fx.store),
            codec::encode(&StatusRecord::error(constants::MSG_GENERIC_ERROR))
        );
    }

    #[test]
    fn test_empty_output_falls_back_to_probe() {
        let fx = fixture();
        let runner = FakeRunner::new();
        runner.push_ok("").push_ok("Status: Disconnected");
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        let record = dispatcher.dispatch("Déconnecter").unwrap();

        assert_eq!(record, StatusRecord::disconnected());
        assert_eq!(runner.calls().len(), 2);
        assert_eq!(runner.calls()[1], vec!["protonvpn", "status"]);
    }

    #[test]
    fn test_unknown_label_writes_nothing() {
        let fx = fixture();
        let runner = FakeRunner::new();
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        let err = dispatcher.dispatch("Mars").unwrap_err();

        assert!(matches!(err, DispatchError::UnknownAction(ref l) if l == "Mars"));
        assert!(!fx.store.path().exists());
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_probe_failure_is_error_without_detail() {
        let fx = fixture();
        let runner = FakeRunner::new();
        runner.push_failure(2, "");
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        assert_eq!(dispatcher.current_status(), StatusRecord::error(""));
    }

    #[test]
    fn test_classify_output_probes_on_empty() {
        let fx = fixture();
        let runner = FakeRunner::new();
        runner.push_ok("Status: Connected\nServer: NL#3\n");
        let cli = VpnCli::new(&runner, "protonvpn", "sudo", vec![]);
        let dispatcher = Dispatcher::new(&cli, &fx.store, &fx.catalog);

        assert_eq!(dispatcher.classify_output(""), StatusRecord::connected("NL#3"));
        assert_eq!(
            dispatcher.classify_output("No connection found"),
            StatusRecord::disconnected()
        );
        assert_eq!(runner.calls().len(), 1);
    }
}
