//! Persistence of the status file read by the bar.
//!
//! The file always holds a decodable payload once [`StatusStore::read`] has
//! returned: a missing, empty or unreadable payload is replaced with a fresh
//! probe of the VPN client. Any other filesystem failure is fatal for the run.

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::core::codec;
use crate::logger::{self, LogLevel};
use crate::state::{CanonicalState, StatusRecord};

/// Produces the record used to (re)initialize the status file.
pub trait StatusSource {
    fn current_status(&self) -> StatusRecord;
}

/// The status file at a fixed path.
///
/// No locking: a single writer per path is assumed.
pub struct StatusStore {
    path: PathBuf,
}

impl StatusStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the persisted state, initializing the file from `source` when
    /// it is missing, empty or undecodable.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on any I/O failure other than "not found".
    pub fn read(&self, source: &dyn StatusSource) -> Result<CanonicalState, StoreError> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                logger::log(
                    LogLevel::Info,
                    "STORE",
                    format!("Creating status file {}", self.path.display()),
                );
                return self.initialize(source);
            }
            Err(e) => return Err(StoreError::read(&self.path, e)),
        };

        if data.iter().all(u8::is_ascii_whitespace) {
            logger::log(LogLevel::Info, "STORE", "Status file is empty, probing");
            return self.initialize(source);
        }

        match codec::decode(&data) {
            Ok(state) => Ok(state),
            Err(e) => {
                logger::log(
                    LogLevel::Warning,
                    "STORE",
                    format!("Discarding unreadable status file: {e}"),
                );
                self.initialize(source)
            }
        }
    }

    /// Overwrites the status file with `record`, creating it with mode 0644.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file or its parent directory cannot be written.
    pub fn write(&self, record: &StatusRecord) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::write(parent, e))?;
            }
        }

        // The mode only applies when the file is created.
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(constants::STATUS_FILE_MODE)
            .open(&self.path)
            .and_then(|mut file| file.write_all(codec::encode(record).as_bytes()))
            .map_err(|e| StoreError::write(&self.path, e))?;

        logger::log(
            LogLevel::Debug,
            "STORE",
            format!("Wrote {} '{}'", record.state, record.detail),
        );
        Ok(())
    }

    fn initialize(&self, source: &dyn StatusSource) -> Result<CanonicalState, StoreError> {
        let record = source.current_status();
        self.write(&record)?;
        Ok(record.state)
    }
}

/// The status file could not be accessed.
#[derive(Debug)]
pub enum StoreError {
    Read { path: PathBuf, source: io::Error },
    Write { path: PathBuf, source: io::Error },
}

impl StoreError {
    fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { path, source } => {
                write!(f, "could not read status file {}: {source}", path.display())
            }
            Self::Write { path, source } => {
                write!(f, "could not write status file {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::os::unix::fs::PermissionsExt;

    /// Always reports the same record and counts how often it was asked.
    struct FixedSource {
        record: StatusRecord,
        probes: Cell<usize>,
    }

    impl FixedSource {
        fn new(record: StatusRecord) -> Self {
            Self {
                record,
                probes: Cell::new(0),
            }
        }
    }

    impl StatusSource for FixedSource {
        fn current_status(&self) -> StatusRecord {
            self.probes.set(self.probes.get() + 1);
            self.record.clone()
        }
    }

    #[test]
    fn test_missing_file_is_created_from_probe() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("protonvpn_status.conf"));
        let source = FixedSource::new(StatusRecord::connected("JP#12"));

        let state = store.read(&source).unwrap();

        assert_eq!(state, CanonicalState::Connected);
        assert_eq!(source.probes.get(), 1);
        let content = fs::read(store.path()).unwrap();
        assert!(!content.is_empty());
        assert_eq!(codec::decode(&content).unwrap(), CanonicalState::Connected);
    }

    #[test]
    fn test_missing_parent_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("i3status").join("vpn.json"));
        let source = FixedSource::new(StatusRecord::disconnected());

        assert_eq!(store.read(&source).unwrap(), CanonicalState::Disconnected);
        assert!(store.path().is_file());
    }

    #[test]
    fn test_existing_file_is_not_probed() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status"));
        store.write(&StatusRecord::working()).unwrap();
        let source = FixedSource::new(StatusRecord::disconnected());

        assert_eq!(store.read(&source).unwrap(), CanonicalState::Working);
        assert_eq!(source.probes.get(), 0);
    }

    #[test]
    fn test_empty_file_is_reinitialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status"));
        fs::write(store.path(), "").unwrap();
        let source = FixedSource::new(StatusRecord::error(""));

        assert_eq!(store.read(&source).unwrap(), CanonicalState::Error);
        assert_eq!(source.probes.get(), 1);
        assert!(!fs::read(store.path()).unwrap().is_empty());
    }

    #[test]
    fn test_garbage_file_is_reinitialized() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status"));
        fs::write(store.path(), "{\"state\": \"Sleepy\"}").unwrap();
        let source = FixedSource::new(StatusRecord::disconnected());

        assert_eq!(store.read(&source).unwrap(), CanonicalState::Disconnected);
        assert_eq!(source.probes.get(), 1);
    }

    #[test]
    fn test_write_sets_mode() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status"));
        store.write(&StatusRecord::disconnected()).unwrap();

        // 0644 narrowed by the process umask.
        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o600, 0o600);
        assert_eq!(mode & 0o133, 0);
    }

    #[test]
    fn test_write_keeps_mode_of_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status"));
        fs::write(store.path(), "old").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o600)).unwrap();

        store.write(&StatusRecord::connected("NL#7")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            codec::encode(&StatusRecord::connected("NL#7"))
        );
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status"));
        store.write(&StatusRecord::connected("a very long server name")).unwrap();
        store.write(&StatusRecord::disconnected()).unwrap();

        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            codec::encode(&StatusRecord::disconnected())
        );
    }

    #[test]
    fn test_unreadable_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the file should be: reading fails with something
        // other than NotFound.
        let store = StatusStore::new(dir.path());
        let source = FixedSource::new(StatusRecord::disconnected());

        assert!(matches!(store.read(&source), Err(StoreError::Read { .. })));
        assert_eq!(source.probes.get(), 0);
    }
}
