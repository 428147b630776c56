//! Process execution via `std::process::Command`.

use std::io::{self, Write};
use std::process::{Command, Stdio};

use crate::logger::{self, LogLevel};
use crate::platform::{CommandOutput, CommandRunner};

/// Runs real processes, capturing stdout and stderr.
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[String],
        stdin: Option<&str>,
    ) -> io::Result<CommandOutput> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
            // A child that exits without reading its input is still reaped below.
            if let Err(e) = pipe.write_all(input.as_bytes()) {
                logger::log(
                    LogLevel::Debug,
                    "PROCESS",
                    format!("{program} did not take its input: {e}"),
                );
            }
            // Dropping the pipe closes it so the child sees EOF.
        }

        let output = child.wait_with_output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
