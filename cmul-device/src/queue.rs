use crate::{DeviceError, DeviceInfo};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;

static NEXT_EVENT: AtomicU64 = AtomicU64::new(1);

/// A single-task unit of work.
///
/// The kernel owns the access handles it was bound to; they are released when
/// `run` returns, before the queue reports completion.
pub trait Kernel: Send + 'static {
    fn name(&self) -> &str;

    fn run(self: Box<Self>) -> Result<(), KernelFault>;
}

/// Error raised from inside a kernel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct KernelFault(pub String);

/// Handle for one submitted unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event(u64);

impl Event {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Returned by [`Queue::wait`] once a kernel has finished.
#[derive(Debug, Clone)]
pub struct Completion {
    pub event: Event,
    pub kernel: String,
    pub elapsed: Duration,
}

type Outcome = Result<Completion, DeviceError>;

struct Job {
    event: Event,
    kernel: Box<dyn Kernel>,
    done: Sender<Outcome>,
}

/// In-order queue bound to one device.
///
/// Exactly one unit of work may be outstanding: `submit` while an event is
/// still pending fails with [`DeviceError::QueueBusy`].
pub struct Queue {
    device: DeviceInfo,
    jobs: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
    pending: Option<(Event, Receiver<Outcome>)>,
}

impl Queue {
    /// Start the device worker.
    pub fn new(device: DeviceInfo) -> Result<Self, DeviceError> {
        let (jobs, rx) = mpsc::channel::<Job>();
        let worker_device = device.clone();
        let worker = thread::Builder::new()
            .name(format!("cmul-{}", device.kind))
            .spawn(move || run_worker(worker_device, rx))
            .map_err(|e| DeviceError::WorkerSpawn(e.to_string()))?;

        tracing::debug!(device = %device.name, "queue created");

        Ok(Self {
            device,
            jobs: Some(jobs),
            worker: Some(worker),
            pending: None,
        })
    }

    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Enqueue one invocation of `kernel`.
    pub fn submit<K: Kernel>(&mut self, kernel: K) -> Result<Event, DeviceError> {
        if let Some((event, _)) = &self.pending {
            return Err(DeviceError::QueueBusy(event.id()));
        }
        let jobs = self.jobs.as_ref().ok_or(DeviceError::QueueClosed)?;

        let event = Event(NEXT_EVENT.fetch_add(1, Ordering::Relaxed));
        let (done, outcome) = mpsc::channel();
        tracing::debug!(event = event.id(), kernel = kernel.name(), "submit");

        jobs.send(Job {
            event,
            kernel: Box::new(kernel),
            done,
        })
        .map_err(|_| DeviceError::QueueClosed)?;

        self.pending = Some((event, outcome));
        Ok(event)
    }

    /// Block until `event` has completed.
    ///
    /// After this returns `Ok`, every output the kernel wrote is readable from
    /// the host and nothing on the device side holds it.
    pub fn wait(&mut self, event: Event) -> Result<Completion, DeviceError> {
        match self.pending.take() {
            Some((pending, outcome)) if pending == event => {
                let completion = outcome.recv().map_err(|_| DeviceError::QueueClosed)??;
                tracing::debug!(
                    event = event.id(),
                    kernel = %completion.kernel,
                    elapsed_us = completion.elapsed.as_micros() as u64,
                    "complete"
                );
                Ok(completion)
            }
            other => {
                self.pending = other;
                Err(DeviceError::UnknownEvent(event.id()))
            }
        }
    }
}

impl Drop for Queue {
    fn drop(&mut self) {
        // Closing the channel ends the worker loop
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(device: DeviceInfo, jobs: Receiver<Job>) {
    for Job { event, kernel, done } in jobs {
        let start = Instant::now();
        if !device.latency.is_zero() {
            thread::sleep(device.latency);
        }

        let name = kernel.name().to_string();
        let outcome = match panic::catch_unwind(AssertUnwindSafe(move || kernel.run())) {
            Ok(Ok(())) => Ok(Completion {
                event,
                kernel: name,
                elapsed: start.elapsed(),
            }),
            Ok(Err(fault)) => Err(DeviceError::RuntimeFault {
                kernel: name,
                reason: fault.0,
            }),
            Err(payload) => Err(DeviceError::RuntimeFault {
                kernel: name,
                reason: panic_reason(payload.as_ref()),
            }),
        };

        // The host may have dropped the receiver; nothing left to report to
        let _ = done.send(outcome);
    }
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "kernel panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        stage_read, stage_write, DeviceKind, Platform, PlatformConfig, ReadAccess, ReadBuffer,
        WriteAccess, WriteBuffer,
    };

    struct Double {
        input: ReadAccess<i64>,
        output: WriteAccess<i64>,
    }

    impl Kernel for Double {
        fn name(&self) -> &str {
            "double"
        }

        fn run(self: Box<Self>) -> Result<(), KernelFault> {
            let v = *self.input.get();
            let doubled = v.checked_mul(2).ok_or_else(|| KernelFault("overflow".into()))?;
            self.output.write(doubled);
            Ok(())
        }
    }

    fn double(input: &ReadBuffer<i64>, output: &WriteBuffer<i64>) -> Double {
        Double {
            input: input.access(),
            output: output.access(),
        }
    }

    struct Panics;

    impl Kernel for Panics {
        fn name(&self) -> &str {
            "panics"
        }

        fn run(self: Box<Self>) -> Result<(), KernelFault> {
            panic!("device exploded");
        }
    }

    fn emulator() -> DeviceInfo {
        Platform::discover(&PlatformConfig::default())
            .select(DeviceKind::Emulator)
            .unwrap()
    }

    #[test]
    fn test_submit_wait_read() {
        let mut queue = Queue::new(emulator()).unwrap();
        let input = stage_read(&21i64);
        let output = stage_write::<i64>();

        let event = queue.submit(double(&input, &output)).unwrap();
        let completion = queue.wait(event).unwrap();

        assert_eq!(completion.event, event);
        assert_eq!(completion.kernel, "double");
        assert_eq!(output.host_read(), Ok(42));
    }

    #[test]
    fn test_one_outstanding_unit() {
        let mut queue = Queue::new(emulator()).unwrap();
        let input = stage_read(&1i64);
        let output = stage_write::<i64>();

        let first = queue.submit(double(&input, &output)).unwrap();
        let second = queue.submit(double(&input, &output));
        assert_eq!(second.unwrap_err(), DeviceError::QueueBusy(first.id()));

        queue.wait(first).unwrap();
        assert_eq!(output.host_read(), Ok(2));
    }

    #[test]
    fn test_wait_unknown_event_keeps_pending() {
        let mut queue = Queue::new(emulator()).unwrap();
        let input = stage_read(&5i64);
        let output = stage_write::<i64>();

        let event = queue.submit(double(&input, &output)).unwrap();
        let bogus = Event(event.id() + 1_000_000);
        assert_eq!(queue.wait(bogus).unwrap_err(), DeviceError::UnknownEvent(bogus.id()));

        queue.wait(event).unwrap();
        assert_eq!(output.host_read(), Ok(10));
    }

    #[test]
    fn test_kernel_fault_is_runtime_fault() {
        let mut queue = Queue::new(emulator()).unwrap();
        let input = stage_read(&i64::MAX);
        let output = stage_write::<i64>();

        let event = queue.submit(double(&input, &output)).unwrap();
        let err = queue.wait(event).unwrap_err();
        assert_eq!(
            err,
            DeviceError::RuntimeFault {
                kernel: "double".into(),
                reason: "overflow".into(),
            }
        );
        assert!(!err.is_device_not_found());
        assert_eq!(output.host_read(), Err(DeviceError::ResultUnavailable));
    }

    #[test]
    fn test_panic_is_contained() {
        let mut queue = Queue::new(emulator()).unwrap();
        let event = queue.submit(Panics).unwrap();
        let err = queue.wait(event).unwrap_err();
        assert!(matches!(
            err,
            DeviceError::RuntimeFault { ref reason, .. } if reason == "device exploded"
        ));

        // worker survives and accepts more work
        let input = stage_read(&4i64);
        let output = stage_write::<i64>();
        let event = queue.submit(double(&input, &output)).unwrap();
        queue.wait(event).unwrap();
        assert_eq!(output.host_read(), Ok(8));
    }

    #[test]
    fn test_simulator_latency_is_observed() {
        let config = PlatformConfig {
            simulator_latency_ms: 5,
            ..Default::default()
        };
        let device = Platform::discover(&config)
            .select(DeviceKind::Simulator)
            .unwrap();
        let mut queue = Queue::new(device).unwrap();

        let input = stage_read(&3i64);
        let output = stage_write::<i64>();
        let event = queue.submit(double(&input, &output)).unwrap();
        let completion = queue.wait(event).unwrap();

        assert!(completion.elapsed >= Duration::from_millis(5));
        assert_eq!(output.host_read(), Ok(6));
    }
}
