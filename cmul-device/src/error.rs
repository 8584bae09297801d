use crate::DeviceKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    #[error("No {0} device found")]
    DeviceNotFound(DeviceKind),
    #[error("Unknown device kind: {0}")]
    UnknownDeviceKind(String),
    #[error("Runtime fault in kernel `{kernel}`: {reason}")]
    RuntimeFault { kernel: String, reason: String },
    #[error("Failed to start device worker: {0}")]
    WorkerSpawn(String),
    #[error("Queue busy: event {0} has not been waited on")]
    QueueBusy(u64),
    #[error("Unknown event {0}")]
    UnknownEvent(u64),
    #[error("Buffer is still bound to a kernel")]
    BufferInUse,
    #[error("Kernel completed without writing its output")]
    ResultUnavailable,
    #[error("Device queue is closed")]
    QueueClosed,
}

impl DeviceError {
    /// True when the environment has no device of the requested kind.
    /// Everything else happened after a device was acquired.
    pub fn is_device_not_found(&self) -> bool {
        matches!(self, DeviceError::DeviceNotFound(_))
    }
}
