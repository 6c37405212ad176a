//! VFAT config drive access through the mtools suite.
//!
//! The drive is never read directly: `mlabel` reports the volume label and `mcopy` pulls
//! the files out. Both run through [`ProcessOps`] so tests can script them.

use crate::config::ToolConfig;
use cfgdrive_error::{CfgDriveError, CfgDriveResult};
use cfgdrive_hal::{DirGuard, ProcessOps};
use log::{debug, info, warn};
use once_cell::sync::OnceCell;
use regex::Regex;
use std::path::Path;

/// Volume label carried by provisioning config drives.
pub const CONFIG_DRIVE_LABEL: &str = "config-2";

pub const MLABEL: &str = "mlabel.exe";
pub const MCOPY: &str = "mcopy.exe";

const VOLUME_LABEL_PATTERN: &str = r"(?m)Volume label is (.*?)\r?$";

static VOLUME_LABEL_RE: OnceCell<Regex> = OnceCell::new();

/// Extract the label from `mlabel -s` output, if the output carries one.
pub fn parse_volume_label(output: &str) -> CfgDriveResult<Option<String>> {
    let re = VOLUME_LABEL_RE
        .get_or_try_init(|| Regex::new(VOLUME_LABEL_PATTERN))
        .map_err(|e| CfgDriveError::Parse(format!("volume label pattern: {}", e)))?;
    Ok(re
        .captures(output.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

/// Check whether `drive_path` holds a VFAT filesystem labelled [`CONFIG_DRIVE_LABEL`].
///
/// Only a missing `mtools_path` (or an unusable label pattern) is an error. An unreadable or non-VFAT volume, a failing
/// `mlabel`, or output without a label line all yield `Ok(false)`, so callers can probe
/// several candidates in a row.
pub fn is_config_drive(
    hal: &dyn ProcessOps,
    cfg: &ToolConfig,
    drive_path: &str,
) -> CfgDriveResult<bool> {
    let mlabel = cfg.tool(MLABEL)?;
    let args = ["-i", drive_path, "-s"];

    let output = match hal.command_output(&mlabel, &args, cfg.probe_timeout()) {
        Ok(output) => output,
        Err(err) => {
            warn!(
                "Could not retrieve label for VFAT drive path {}: mlabel could not be run: {}",
                drive_path, err
            );
            return Ok(false);
        }
    };

    if !output.success() {
        warn!(
            "Could not retrieve label for VFAT drive path {}: mlabel failed with error {:?}",
            drive_path,
            output.stderr_lossy().trim()
        );
        return Ok(false);
    }

    match parse_volume_label(&output.stdout_lossy())? {
        Some(label) if label == CONFIG_DRIVE_LABEL => {
            debug!("drive {} has volume label {:?}", drive_path, label);
            Ok(true)
        }
        Some(label) => {
            warn!(
                "VFAT drive {} has volume label {:?}, expected {:?}",
                drive_path, label, CONFIG_DRIVE_LABEL
            );
            Ok(false)
        }
        None => {
            warn!("mlabel reported no volume label for {}", drive_path);
            Ok(false)
        }
    }
}

/// Copy everything from the VFAT drive at `drive_path` into `target_path`.
///
/// `mcopy` runs with the process working directory set to `target_path`; the previous
/// directory is restored on every exit path. A non-zero `mcopy` exit, launch failure or
/// timeout is returned as [`CfgDriveError::Process`].
pub fn copy_from_vfat_drive(
    hal: &dyn ProcessOps,
    cfg: &ToolConfig,
    drive_path: &str,
    target_path: &Path,
) -> CfgDriveResult<()> {
    let mcopy = cfg.tool(MCOPY)?;

    let _cwd = DirGuard::enter(target_path).map_err(|source| CfgDriveError::TargetDir {
        path: target_path.to_path_buf(),
        source,
    })?;

    // mcopy -s -n -i \\.\PHYSICALDRIVEx ::/ .
    let args = ["-s", "-n", "-i", drive_path, "::/", "."];
    info!(
        "Copying contents of VFAT drive {:?} into {}",
        drive_path,
        target_path.display()
    );
    hal.command_status(&mcopy, &args, cfg.copy_timeout())?;

    debug!("mcopy finished for {:?}", drive_path);
    Ok(())
}
