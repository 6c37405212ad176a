//! Probe candidate drives in order and extract the first config drive found.

use crate::config::ToolConfig;
use crate::vfat::{copy_from_vfat_drive, is_config_drive};
use cfgdrive_error::CfgDriveResult;
use cfgdrive_hal::ProcessOps;
use log::info;
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeResult {
    pub drive: String,
    pub config_drive: bool,
}

/// Outcome of a scan, suitable for printing or `--json` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub target: PathBuf,
    pub probed: Vec<ProbeResult>,
    /// Drive whose contents were copied into `target`, if any.
    pub extracted_from: Option<String>,
}

impl ScanReport {
    pub fn found(&self) -> bool {
        self.extracted_from.is_some()
    }
}

/// Probe `drives` one after another; extract the first one labelled as a config drive.
///
/// Drives after the match are not probed. Extraction failures are returned, not skipped.
pub fn scan_and_extract(
    hal: &dyn ProcessOps,
    cfg: &ToolConfig,
    drives: &[String],
    target: &Path,
) -> CfgDriveResult<ScanReport> {
    let mut report = ScanReport {
        target: target.to_path_buf(),
        probed: Vec::new(),
        extracted_from: None,
    };

    for drive in drives {
        let config_drive = is_config_drive(hal, cfg, drive)?;
        report.probed.push(ProbeResult {
            drive: drive.clone(),
            config_drive,
        });
        if !config_drive {
            continue;
        }

        info!("Found config drive at {:?}", drive);
        copy_from_vfat_drive(hal, cfg, drive, target)?;
        report.extracted_from = Some(drive.clone());
        break;
    }

    Ok(report)
}
