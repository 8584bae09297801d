//! # cmul-device
//!
//! CPU reference implementation of the accelerator execution environment the
//! cmul kernel runs on.
//!
//! - [`Platform`]: enumerate devices (emulator, simulator, configured boards)
//!   and select one by [`DeviceKind`]
//! - [`stage_read`] / [`stage_write`]: copy host values into device-visible
//!   storage and hand out typed access handles for kernels
//! - [`Queue`]: run exactly one [`Kernel`] at a time on a device worker,
//!   `submit` → [`Event`] → `wait`
//!
//! Failures are reported as [`DeviceError`], which separates a missing device
//! from a fault raised while a kernel was running.

pub mod buffer;
pub mod device;
pub mod error;
pub mod queue;

pub use buffer::{stage_read, stage_write, ReadAccess, ReadBuffer, WriteAccess, WriteBuffer};
pub use device::{DeviceInfo, DeviceKind, Platform, PlatformConfig};
pub use error::DeviceError;
pub use queue::{Completion, Event, Kernel, KernelFault, Queue};
