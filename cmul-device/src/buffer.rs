use crate::DeviceError;
use std::sync::{Arc, Mutex, PoisonError};

/// Copy a host value into device-visible, read-only storage.
pub fn stage_read<T: Clone + Send + Sync + 'static>(value: &T) -> ReadBuffer<T> {
    tracing::trace!(bytes = std::mem::size_of::<T>(), "staged read-only buffer");
    ReadBuffer {
        data: Arc::new(value.clone()),
    }
}

/// Allocate device-visible, write-only storage. Its contents are undefined
/// until a kernel writes them.
pub fn stage_write<T: Send + 'static>() -> WriteBuffer<T> {
    tracing::trace!(bytes = std::mem::size_of::<T>(), "staged write-only buffer");
    WriteBuffer {
        slot: Arc::new(Mutex::new(None)),
    }
}

/// Host side of a staged input.
#[derive(Debug)]
pub struct ReadBuffer<T> {
    data: Arc<T>,
}

impl<T> ReadBuffer<T> {
    /// Handle a kernel uses to read the staged value
    pub fn access(&self) -> ReadAccess<T> {
        ReadAccess {
            data: Arc::clone(&self.data),
        }
    }
}

#[derive(Debug)]
pub struct ReadAccess<T> {
    data: Arc<T>,
}

impl<T> ReadAccess<T> {
    pub fn get(&self) -> &T {
        &self.data
    }
}

/// Host side of a staged output.
#[derive(Debug)]
pub struct WriteBuffer<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T: Clone> WriteBuffer<T> {
    /// Handle a kernel uses to write the result
    pub fn access(&self) -> WriteAccess<T> {
        WriteAccess {
            slot: Arc::clone(&self.slot),
        }
    }

    /// Copy the result back to the host.
    ///
    /// Only valid once every [`WriteAccess`] has been dropped, which the queue
    /// guarantees for a kernel before its event completes.
    pub fn host_read(&self) -> Result<T, DeviceError> {
        if Arc::strong_count(&self.slot) > 1 {
            return Err(DeviceError::BufferInUse);
        }
        let slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        slot.clone().ok_or(DeviceError::ResultUnavailable)
    }
}

#[derive(Debug)]
pub struct WriteAccess<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> WriteAccess<T> {
    pub fn write(&self, value: T) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_buffer_is_a_copy() {
        let mut host = vec![1, 2, 3];
        let staged = stage_read(&host);
        host.push(4);

        assert_eq!(staged.access().get(), &vec![1, 2, 3]);
    }

    #[test]
    fn test_write_buffer_lifecycle() {
        let out = stage_write::<i64>();
        assert_eq!(out.host_read(), Err(DeviceError::ResultUnavailable));

        let handle = out.access();
        handle.write(42);
        // still bound to the device side
        assert_eq!(out.host_read(), Err(DeviceError::BufferInUse));

        drop(handle);
        assert_eq!(out.host_read(), Ok(42));
    }
}
