use anyhow::{bail, Context, Result};
use cfgdrive_core::cli::{resolve_drive, Cli, Command};
use cfgdrive_core::{config, logging, scan, vfat};
use cfgdrive_hal::LinuxHal;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_file.as_deref());

    let cfg = config::load_config(cli.config.as_deref(), cli.mtools_path.clone())
        .context("failed to load configuration")?;
    let hal = LinuxHal::new();

    match cli.command {
        Command::Probe { drive } => {
            let found = vfat::is_config_drive(&hal, &cfg, &drive)?;
            println!("{}", found);
        }
        Command::Extract { drive, target } => {
            let drive = resolve_drive(&drive)
                .with_context(|| format!("failed to resolve drive path {}", drive))?;
            vfat::copy_from_vfat_drive(&hal, &cfg, &drive, &target).with_context(|| {
                format!("failed to extract {} into {}", drive, target.display())
            })?;
            info!("✅ Extracted {} into {}", drive, target.display());
        }
        Command::Scan {
            target,
            drives,
            json,
        } => {
            let drives = drives
                .iter()
                .map(|d| {
                    resolve_drive(d).with_context(|| format!("failed to resolve drive path {}", d))
                })
                .collect::<Result<Vec<_>>>()?;
            let report = scan::scan_and_extract(&hal, &cfg, &drives, &target)
                .with_context(|| format!("scan into {} failed", target.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for probe in &report.probed {
                    println!("{}\t{}", probe.drive, probe.config_drive);
                }
                if let Some(drive) = &report.extracted_from {
                    println!("extracted {} into {}", drive, report.target.display());
                }
            }

            if !report.found() {
                bail!("no config drive among {} candidate(s)", drives.len());
            }
        }
    }

    Ok(())
}
