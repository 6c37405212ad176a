//! Tool configuration.
//!
//! A single [`ToolConfig`] is assembled at startup (TOML file + CLI overrides) and passed
//! explicitly into every drive operation.

use cfgdrive_error::{CfgDriveError, CfgDriveResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_COPY_TIMEOUT_SECS: u64 = 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Directory containing the mtools binaries (`mlabel.exe`, `mcopy.exe`).
    pub mtools_path: Option<PathBuf>,
    pub probe_timeout_secs: u64,
    pub copy_timeout_secs: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            mtools_path: None,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT_SECS,
            copy_timeout_secs: DEFAULT_COPY_TIMEOUT_SECS,
        }
    }
}

impl ToolConfig {
    pub fn new(mtools_path: impl Into<PathBuf>) -> Self {
        Self {
            mtools_path: Some(mtools_path.into()),
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> CfgDriveResult<Self> {
        toml::from_str(text)
            .map_err(|e| CfgDriveError::Configuration(format!("invalid config TOML: {}", e)))
    }

    pub fn load(path: &Path) -> CfgDriveResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            CfgDriveError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Fail unless the mtools directory is set. Launches nothing.
    pub fn ensure_configured(&self) -> CfgDriveResult<&Path> {
        match self.mtools_path.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => Ok(path),
            _ => Err(CfgDriveError::Configuration(
                "\"mtools_path\" needs to be provided in order to access VFAT drives".to_string(),
            )),
        }
    }

    /// Full path of the mtools executable `name`.
    pub fn tool(&self, name: &str) -> CfgDriveResult<PathBuf> {
        Ok(self.ensure_configured()?.join(name))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn copy_timeout(&self) -> Duration {
        Duration::from_secs(self.copy_timeout_secs)
    }
}

/// Build the effective configuration: optional TOML file, then the CLI/env override.
///
/// A relative `mtools_path` is resolved against the current directory, once.
pub fn load_config(
    config_file: Option<&Path>,
    mtools_path: Option<PathBuf>,
) -> CfgDriveResult<ToolConfig> {
    let mut cfg = match config_file {
        Some(path) => ToolConfig::load(path)?,
        None => ToolConfig::default(),
    };
    if mtools_path.is_some() {
        cfg.mtools_path = mtools_path;
    }
    // Anchor a relative mtools_path to the startup directory; extraction changes the cwd.
    if let Some(path) = cfg.mtools_path.take() {
        cfg.mtools_path = Some(if path.is_relative() && !path.as_os_str().is_empty() {
            std::env::current_dir()?.join(path)
        } else {
            path
        });
    }
    log::debug!("effective config: {:?}", cfg);
    Ok(cfg)
}
