use once_cell::sync::Lazy;
use std::sync::{Mutex, MutexGuard};

/// Global lock to serialize tests that observe the process-wide working directory.
static CWD_TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub struct CwdLockGuard(#[allow(dead_code)] MutexGuard<'static, ()>);

pub fn lock() -> CwdLockGuard {
    let guard = match CWD_TEST_LOCK.lock() {
        Ok(g) => g,
        Err(poisoned) => poisoned.into_inner(),
    };
    CwdLockGuard(guard)
}
