//! cfgdrive core library.
//!
//! Detects VFAT config drives (volume label `config-2`) and extracts their contents using
//! the external mtools binaries. Process execution and working-directory changes go through
//! `cfgdrive-hal`.

pub mod cli;
pub mod config;
pub mod logging;
pub mod scan;
pub mod vfat;

#[cfg(test)]
mod test_env;

pub use config::ToolConfig;
pub use scan::{scan_and_extract, ProbeResult, ScanReport};
pub use vfat::{copy_from_vfat_drive, is_config_drive, CONFIG_DRIVE_LABEL};
