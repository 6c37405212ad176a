//! CLI argument parsing for cfgdrive.

use clap::{Parser, Subcommand};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "cfgdrive")]
#[command(about = "Detect VFAT config drives (label config-2) and extract them with mtools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory containing mlabel.exe and mcopy.exe (overrides the config file)
    #[arg(long, env = "CFGDRIVE_MTOOLS_PATH", global = true)]
    pub mtools_path: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a drive is a config drive; prints true or false
    Probe {
        /// Raw drive or image path (e.g. \\.\PHYSICALDRIVE1)
        drive: String,
    },

    /// Copy every file from a drive into an existing directory
    Extract {
        /// Raw drive or image path; relative image files are made absolute
        drive: String,
        target: PathBuf,
    },

    /// Probe drives in order and extract the first config drive
    Scan {
        /// Existing directory to extract into
        target: PathBuf,

        /// Candidate drives, probed in the given order (relative image files are made absolute)
        #[arg(required = true)]
        drives: Vec<String>,

        /// Print the scan report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Make a relative path to an existing image file absolute.
///
/// `mcopy` runs from inside the extraction target, where a relative image path no longer
/// resolves. Device paths and anything that is not an existing file pass through unchanged.
pub fn resolve_drive(drive: &str) -> io::Result<String> {
    let path = Path::new(drive);
    if path.is_relative() && path.is_file() {
        let absolute = std::env::current_dir()?.join(path);
        return Ok(absolute.to_string_lossy().into_owned());
    }
    Ok(drive.to_string())
}
