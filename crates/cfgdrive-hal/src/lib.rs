//! cfgdrive Hardware Abstraction Layer (HAL).
//!
//! Everything that touches the outside world (spawning the mtools binaries, changing the
//! process working directory) goes through this crate so the drive logic can be tested
//! against [`FakeHal`] without real devices.

pub mod hal;

#[cfg(test)]
mod test_env;

pub use cfgdrive_error::{HalError, HalResult};
pub use hal::*;
