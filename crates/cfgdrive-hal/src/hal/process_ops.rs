//! Process execution helpers.
//!
//! External commands are considered "world-touching" and must go through the HAL so we can
//! test the drive logic without spawning real processes.

use crate::{HalError, HalResult};
use std::path::Path;
use std::process::Output;
use std::time::Duration;

/// Captured result of a finished external command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code, `None` if the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ProcessOutput {
    pub fn new(code: i32, stdout: impl Into<Vec<u8>>, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(code),
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

impl From<Output> for ProcessOutput {
    fn from(output: Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Build the error reported for a command that ran but did not exit cleanly.
pub fn output_failed(program: &Path, output: &ProcessOutput) -> HalError {
    HalError::CommandFailed {
        program: program.display().to_string(),
        code: output.code,
        stderr: output.stderr_lossy().trim().to_string(),
    }
}

/// Process execution trait (external command runner).
///
/// Arguments are passed as a vector straight to the executable; nothing is ever
/// interpreted by a shell.
pub trait ProcessOps {
    /// Run `program` and capture its exit code and output streams.
    ///
    /// A non-zero exit is *not* an error here; callers inspect [`ProcessOutput::code`].
    fn command_output(
        &self,
        program: &Path,
        args: &[&str],
        timeout: Duration,
    ) -> HalResult<ProcessOutput>;

    /// Run `program`, treating any non-zero exit as [`HalError::CommandFailed`].
    fn command_status(&self, program: &Path, args: &[&str], timeout: Duration) -> HalResult<()> {
        let output = self.command_output(program, args, timeout)?;
        if !output.success() {
            return Err(output_failed(program, &output));
        }
        Ok(())
    }
}
