use once_cell::sync::Lazy;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Serializes every scoped change of the process working directory.
static CWD_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

/// RAII guard that changes the process working directory and restores it when dropped.
///
/// The working directory is process-global, so the guard holds a process-wide lock for
/// its whole lifetime: a second `enter` blocks until the first guard is dropped.
#[derive(Debug)]
pub struct DirGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    /// Record the current directory, then change into `target`.
    ///
    /// If `target` cannot be entered the working directory is left untouched.
    pub fn enter(target: &Path) -> io::Result<Self> {
        let lock = match CWD_LOCK.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(target)?;
        log::debug!(
            "entered {} (was {})",
            target.display(),
            previous.display()
        );
        Ok(Self {
            previous,
            _lock: lock,
        })
    }

    /// Directory that will be restored on drop.
    pub fn previous(&self) -> &Path {
        &self.previous
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        if let Err(err) = std::env::set_current_dir(&self.previous) {
            log::warn!(
                "dir guard failed to restore {}: {}",
                self.previous.display(),
                err
            );
        }
    }
}
