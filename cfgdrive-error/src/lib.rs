use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type HalResult<T> = Result<T, HalError>;
pub type CfgDriveResult<T> = Result<T, CfgDriveError>;

/// Failures of the process-execution layer.
#[derive(Error, Debug)]
pub enum HalError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command failed: {program} (exit={code:?}): {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Command timed out: {program} after {timeout_secs}s")]
    CommandTimeout { program: String, timeout_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum CfgDriveError {
    /// Required configuration is missing or unusable. Raised before any command runs.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An external tool could not be launched or exited abnormally.
    #[error(transparent)]
    Process(#[from] HalError),

    #[error("Cannot enter extraction target {}: {source}", path.display())]
    TargetDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CfgDriveError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, CfgDriveError::Configuration(_))
    }

    pub fn is_process(&self) -> bool {
        matches!(self, CfgDriveError::Process(_))
    }
}
