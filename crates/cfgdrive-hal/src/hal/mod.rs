//! HAL trait definitions and implementations.
//!
//! This module defines the process-execution trait and provides both a real
//! (LinuxHal) and a fake (FakeHal) implementation, plus the scoped directory guard.

pub mod fake_hal;
pub mod guards;
pub mod linux_hal;
pub mod process_ops;

pub use fake_hal::{FakeHal, FakeResponse, Operation};
pub use guards::DirGuard;
pub use linux_hal::LinuxHal;
pub use process_ops::{ProcessOps, ProcessOutput};
