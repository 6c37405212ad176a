//! Fake HAL implementation for testing.
//!
//! This implementation records every command without executing it and replies with
//! scripted responses, allowing CI-safe testing without mtools or real drives.

use super::{ProcessOps, ProcessOutput};
use crate::{HalError, HalResult};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Operation records for testing and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Command {
        program: PathBuf,
        args: Vec<String>,
        /// Process working directory at the moment the command was issued.
        cwd: Option<PathBuf>,
        timeout_secs: u64,
    },
}

/// Scripted reply for a faked command.
#[derive(Debug, Clone)]
pub enum FakeResponse {
    /// The command "ran" and produced this output.
    Output(ProcessOutput),
    /// The executable could not be launched.
    NotFound,
    /// The command exceeded its timeout.
    Timeout,
}

impl FakeResponse {
    pub fn success(stdout: &str) -> Self {
        Self::Output(ProcessOutput::new(0, stdout, ""))
    }

    pub fn exit(code: i32, stdout: &str, stderr: &str) -> Self {
        Self::Output(ProcessOutput::new(code, stdout, stderr))
    }
}

/// Shared state for FakeHal operations.
#[derive(Debug, Default)]
struct FakeHalState {
    /// All operations that were recorded
    operations: Vec<Operation>,
    /// Pending replies, keyed by executable file name (e.g. `mlabel.exe`)
    responses: HashMap<String, VecDeque<FakeResponse>>,
}

/// Fake HAL implementation that records commands without executing them.
///
/// Commands with no scripted response succeed with empty output.
#[derive(Debug, Clone, Default)]
pub struct FakeHal {
    state: Arc<Mutex<FakeHalState>>,
}

fn program_key(program: &Path) -> String {
    program
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| program.display().to_string())
}

impl FakeHal {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, FakeHalState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Queue a reply for the next invocation of the executable named `program`.
    pub fn respond(&self, program: &str, response: FakeResponse) -> &Self {
        self.state()
            .responses
            .entry(program.to_string())
            .or_default()
            .push_back(response);
        self
    }

    /// Get all recorded operations.
    pub fn operations(&self) -> Vec<Operation> {
        self.state().operations.clone()
    }

    /// Get the number of operations recorded.
    pub fn operation_count(&self) -> usize {
        self.state().operations.len()
    }

    /// Check if a specific operation was recorded.
    pub fn has_operation(&self, check: impl Fn(&Operation) -> bool) -> bool {
        self.state().operations.iter().any(check)
    }

    /// Clear all recorded operations and pending replies.
    pub fn clear(&self) {
        let mut state = self.state();
        state.operations.clear();
        state.responses.clear();
    }

    fn record_operation(&self, op: Operation) {
        self.state().operations.push(op);
    }

    fn next_response(&self, program: &Path) -> Option<FakeResponse> {
        self.state()
            .responses
            .get_mut(&program_key(program))
            .and_then(VecDeque::pop_front)
    }
}

impl ProcessOps for FakeHal {
    fn command_output(
        &self,
        program: &Path,
        args: &[&str],
        timeout: Duration,
    ) -> HalResult<ProcessOutput> {
        self.record_operation(Operation::Command {
            program: program.to_path_buf(),
            args: args.iter().map(|s| s.to_string()).collect(),
            cwd: std::env::current_dir().ok(),
            timeout_secs: timeout.as_secs(),
        });

        match self.next_response(program) {
            None => Ok(ProcessOutput::new(0, "", "")),
            Some(FakeResponse::Output(output)) => Ok(output),
            Some(FakeResponse::NotFound) => {
                Err(HalError::CommandNotFound(program.display().to_string()))
            }
            Some(FakeResponse::Timeout) => Err(HalError::CommandTimeout {
                program: program.display().to_string(),
                timeout_secs: timeout.as_secs(),
            }),
        }
    }
}
