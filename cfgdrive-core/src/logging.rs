use std::path::Path;

pub fn init(verbose: bool, log_file: Option<&Path>) {
    use env_logger::{Env, Target};
    use std::fs;
    use std::io;

    // Provisioning runs unattended at first boot, so a log file is preferred when given.
    // If we cannot open it (permissions, readonly FS, etc.), fall back to stderr.
    let target = log_file
        .and_then(|path| {
            (|| -> io::Result<Target> {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                let file = fs::OpenOptions::new().create(true).append(true).open(path)?;
                Ok(Target::Pipe(Box::new(file)))
            })()
            .ok()
        })
        .unwrap_or(Target::Stderr);

    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // RUST_LOG, when set, overrides the default level.
    env_logger::Builder::new()
        .filter_level(level)
        .parse_env(Env::default())
        .target(target)
        .init();
}
