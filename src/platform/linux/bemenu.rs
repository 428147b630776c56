//! Action menu through `bemenu` (or any dmenu-compatible program).

use crate::platform::{CommandRunner, MenuPresenter};
use crate::logger::{self, LogLevel};

/// Pipes newline-separated labels to a dmenu-style program and reads the
/// choice back from stdout.
pub struct Bemenu<'a> {
    runner: &'a dyn CommandRunner,
    command: String,
    extra_args: Vec<String>,
}

impl<'a> Bemenu<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        command: impl Into<String>,
        extra_args: Vec<String>,
    ) -> Self {
        Self {
            runner,
            command: command.into(),
            extra_args,
        }
    }
}

impl MenuPresenter for Bemenu<'_> {
    fn select(&self, labels: &[&str], prompt: &str) -> Option<String> {
        let mut args = vec!["--prompt".to_string(), prompt.to_string()];
        args.extend(self.extra_args.iter().cloned());

        let input = labels.join("\n");
        let output = match self.runner.run(&self.command, &args, Some(&input)) {
            Ok(output) => output,
            Err(e) => {
                logger::log(
                    LogLevel::Warning,
                    "MENU",
                    format!("Could not run {}: {e}", self.command),
                );
                return None;
            }
        };

        // bemenu exits non-zero when dismissed with Escape.
        if !output.success {
            logger::log(
                LogLevel::Debug,
                "MENU",
                format!("Menu dismissed (exit {:?})", output.code),
            );
            return None;
        }

        let choice = output.stdout.trim_end_matches(['\n', '\r']);
        if choice.is_empty() {
            None
        } else {
            Some(choice.to_string())
        }
    }
}
