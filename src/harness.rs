use crate::ComplexMultiplyKernel;
use cmul_device::{
    stage_read, stage_write, Completion, DeviceError, DeviceInfo, Event, Queue, ReadBuffer,
    WriteBuffer,
};
use cmul_math::{ComplexFixed, Format};

/// Host driver for the complex multiply kernel.
///
/// Program order is strict: both inputs are staged before `dispatch`, and the
/// output is only read after `synchronize` has returned.
pub struct ExecutionHarness {
    queue: Queue,
}

impl ExecutionHarness {
    pub fn new(device: DeviceInfo) -> Result<Self, DeviceError> {
        Ok(Self {
            queue: Queue::new(device)?,
        })
    }

    pub fn device(&self) -> &DeviceInfo {
        self.queue.device()
    }

    /// Expose an input to the device (read-only copy)
    pub fn stage_input(&self, value: &ComplexFixed) -> ReadBuffer<ComplexFixed> {
        stage_read(value)
    }

    /// Allocate the write-only output
    pub fn stage_output(&self) -> WriteBuffer<ComplexFixed> {
        stage_write()
    }

    /// Enqueue exactly one multiply bound to the staged buffers.
    pub fn dispatch(
        &mut self,
        a: &ReadBuffer<ComplexFixed>,
        b: &ReadBuffer<ComplexFixed>,
        out: &WriteBuffer<ComplexFixed>,
        format: Format,
    ) -> Result<Event, DeviceError> {
        self.queue.submit(ComplexMultiplyKernel {
            a: a.access(),
            b: b.access(),
            out: out.access(),
            format,
        })
    }

    /// Block until the dispatched multiply has finished.
    pub fn synchronize(&mut self, event: Event) -> Result<Completion, DeviceError> {
        self.queue.wait(event)
    }

    /// Stage, dispatch, synchronize and copy the product back to the host.
    pub fn run_multiply(
        &mut self,
        a: &ComplexFixed,
        b: &ComplexFixed,
        format: Format,
    ) -> Result<ComplexFixed, DeviceError> {
        let a = self.stage_input(a);
        let b = self.stage_input(b);
        let out = self.stage_output();

        let event = self.dispatch(&a, &b, &out, format)?;
        self.synchronize(event)?;
        out.host_read()
    }
}
