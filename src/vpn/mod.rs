//! `protonvpn` command-line client wrapper.
//!
//! Two kinds of invocation exist: the read-only `status` probe, run as the
//! current user, and state-changing subcommands, run through the privilege
//! wrapper (`sudo protonvpn connect -f`, ...).

mod catalog;

pub use catalog::{ActionCatalog, CatalogError, MenuAction};

use std::fmt;
use std::io;

use crate::constants;
use crate::logger::{self, LogLevel};
use crate::platform::CommandRunner;

/// How to reach the VPN client.
pub struct VpnCli<'a> {
    runner: &'a dyn CommandRunner,
    binary: String,
    privilege_command: String,
    privilege_args: Vec<String>,
}

impl<'a> VpnCli<'a> {
    /// `privilege_command` may be empty to run subcommands directly.
    pub fn new(
        runner: &'a dyn CommandRunner,
        binary: impl Into<String>,
        privilege_command: impl Into<String>,
        privilege_args: Vec<String>,
    ) -> Self {
        Self {
            runner,
            binary: binary.into(),
            privilege_command: privilege_command.into(),
            privilege_args,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    /// Runs `protonvpn status` and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecError`] if the client cannot be launched or exits non-zero.
    pub fn probe_status(&self) -> Result<String, ExecError> {
        let args = vec![constants::VPN_STATUS_SUBCOMMAND.to_string()];
        self.run(&self.binary, &args)
    }

    /// Runs a catalog subcommand with elevated privileges and returns its stdout.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecError`] if the command cannot be launched or exits non-zero.
    pub fn execute(&self, command: &str) -> Result<String, ExecError> {
        let words = command.split_whitespace().map(str::to_string);

        if self.privilege_command.is_empty() {
            let args: Vec<String> = words.collect();
            return self.run(&self.binary, &args);
        }

        let mut args = self.privilege_args.clone();
        args.push(self.binary.clone());
        args.extend(words);
        self.run(&self.privilege_command, &args)
    }

    fn run(&self, program: &str, args: &[String]) -> Result<String, ExecError> {
        logger::log(
            LogLevel::Debug,
            "VPN",
            format!("Running: {program} {}", args.join(" ")),
        );

        let output = self.runner.run(program, args, None).map_err(|e| {
            logger::log(
                LogLevel::Error,
                "VPN",
                format!("Failed to launch {program}: {e}"),
            );
            ExecError::Launch(e)
        })?;

        if !output.success {
            logger::log(
                LogLevel::Error,
                "VPN",
                format!(
                    "{program} {} exited with {:?}: {}",
                    args.join(" "),
                    output.code,
                    output.stderr.trim()
                ),
            );
            return Err(ExecError::Failed {
                code: output.code,
                stderr: output.stderr,
            });
        }

        Ok(output.stdout)
    }
}

/// The external command did not complete successfully.
#[derive(Debug)]
pub enum ExecError {
    /// The process could not be started.
    Launch(io::Error),
    /// The process exited non-zero (or was killed, `code` is `None`).
    Failed { code: Option<i32>, stderr: String },
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Launch(e) => write!(f, "could not launch command: {e}"),
            Self::Failed { code: Some(c), stderr } => {
                write!(f, "command exited with status {c}: {}", stderr.trim())
            }
            Self::Failed { code: None, stderr } => {
                write!(f, "command terminated by signal: {}", stderr.trim())
            }
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Launch(e) => Some(e),
            Self::Failed { .. } => None,
        }
    }
}
