use cfgdrive_core::{copy_from_vfat_drive, is_config_drive, ToolConfig};
use cfgdrive_hal::{FakeHal, FakeResponse, Operation};
use log::{Level, LevelFilter, Log, Metadata, Record};
use once_cell::sync::Lazy;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Tests in this file compare the working directory before and after extraction.
static CWD_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn cwd_lock() -> MutexGuard<'static, ()> {
    match CWD_LOCK.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Collects every log record emitted by the library during this test binary.
struct CaptureLogger;

static RECORDS: Lazy<Mutex<Vec<(Level, String)>>> = Lazy::new(|| Mutex::new(Vec::new()));
static LOGGER: CaptureLogger = CaptureLogger;
static LOGGER_INIT: Lazy<()> = Lazy::new(|| {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Debug);
});

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut records = match RECORDS.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

fn capture_logs() {
    Lazy::force(&LOGGER_INIT);
}

/// Warnings mentioning every one of `needles`. Tests run in parallel, so filter narrowly.
fn warnings_with(needles: &[&str]) -> Vec<String> {
    let records = match RECORDS.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    };
    records
        .iter()
        .filter(|(level, msg)| *level == Level::Warn && needles.iter().all(|n| msg.contains(n)))
        .map(|(_, msg)| msg.clone())
        .collect()
}

const PHYSICAL_DRIVE: &str = r"\\.\PHYSICALDRIVE1";

fn tools() -> ToolConfig {
    ToolConfig::new("/tools")
}

#[test]
fn config_2_label_is_detected() {
    let hal = FakeHal::new();
    hal.respond("mlabel.exe", FakeResponse::success("Volume label is config-2"));

    assert!(is_config_drive(&hal, &tools(), PHYSICAL_DRIVE).unwrap());
    assert!(hal.has_operation(|op| matches!(
        op,
        Operation::Command { program, args, .. }
            if program == &PathBuf::from("/tools/mlabel.exe")
                && args == &["-i", PHYSICAL_DRIVE, "-s"]
    )));
}

#[test]
fn failing_mlabel_is_not_a_config_drive() {
    let hal = FakeHal::new();
    hal.respond(
        "mlabel.exe",
        FakeResponse::exit(1, "", "init: non DOS media"),
    );

    capture_logs();

    assert!(!is_config_drive(&hal, &tools(), PHYSICAL_DRIVE).unwrap());
    assert_eq!(
        warnings_with(&[PHYSICAL_DRIVE, "init: non DOS media"]).len(),
        1
    );
}

#[test]
fn other_label_is_not_a_config_drive() {
    let hal = FakeHal::new();
    hal.respond("mlabel.exe", FakeResponse::success("Volume label is OTHER\n"));
    capture_logs();

    assert!(!is_config_drive(&hal, &tools(), PHYSICAL_DRIVE).unwrap());
    assert!(!warnings_with(&[PHYSICAL_DRIVE, "OTHER"]).is_empty());
}

#[test]
fn output_without_label_line_warns() {
    let drive = r"\\.\PHYSICALDRIVE7";
    let hal = FakeHal::new();
    hal.respond("mlabel.exe", FakeResponse::success("Volume has no label\n"));
    capture_logs();

    assert!(!is_config_drive(&hal, &tools(), drive).unwrap());
    assert_eq!(warnings_with(&[drive, "no volume label"]).len(), 1);
}

#[test]
fn trailing_newline_is_trimmed() {
    let hal = FakeHal::new();
    hal.respond("mlabel.exe", FakeResponse::success("Volume label is config-2\n"));

    assert!(is_config_drive(&hal, &tools(), PHYSICAL_DRIVE).unwrap());
}

#[test]
fn missing_mtools_path_fails_before_any_command() {
    let _cwd = cwd_lock();
    let hal = FakeHal::new();
    let target = tempfile::tempdir().unwrap();
    let cfg = ToolConfig::default();

    assert!(is_config_drive(&hal, &cfg, PHYSICAL_DRIVE)
        .unwrap_err()
        .is_configuration());
    assert!(copy_from_vfat_drive(&hal, &cfg, PHYSICAL_DRIVE, target.path())
        .unwrap_err()
        .is_configuration());
    assert_eq!(hal.operation_count(), 0);
}

#[test]
fn extraction_succeeds_and_restores_cwd() {
    let _cwd = cwd_lock();
    let before = std::env::current_dir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let hal = FakeHal::new();

    copy_from_vfat_drive(&hal, &tools(), PHYSICAL_DRIVE, out.path()).unwrap();

    assert_eq!(std::env::current_dir().unwrap(), before);
    let ops = hal.operations();
    assert_eq!(ops.len(), 1);
    let Operation::Command {
        program, args, cwd, ..
    } = &ops[0];
    assert_eq!(program, &PathBuf::from("/tools/mcopy.exe"));
    assert_eq!(args, &["-s", "-n", "-i", PHYSICAL_DRIVE, "::/", "."]);
    assert_eq!(
        cwd.as_ref().unwrap().canonicalize().unwrap(),
        out.path().canonicalize().unwrap()
    );
}

#[test]
fn launch_failure_is_process_error_and_restores_cwd() {
    let _cwd = cwd_lock();
    let before = std::env::current_dir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let hal = FakeHal::new();
    hal.respond("mcopy.exe", FakeResponse::NotFound);

    let err = copy_from_vfat_drive(&hal, &tools(), PHYSICAL_DRIVE, out.path()).unwrap_err();

    assert!(err.is_process());
    assert_eq!(std::env::current_dir().unwrap(), before);
}

#[test]
fn timeout_is_process_error_and_restores_cwd() {
    let _cwd = cwd_lock();
    let before = std::env::current_dir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let hal = FakeHal::new();
    hal.respond("mcopy.exe", FakeResponse::Timeout);

    let err = copy_from_vfat_drive(&hal, &tools(), PHYSICAL_DRIVE, out.path()).unwrap_err();

    assert!(err.is_process());
    assert!(err.to_string().contains("timed out"));
    assert_eq!(std::env::current_dir().unwrap(), before);
}
