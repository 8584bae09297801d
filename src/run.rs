use crate::{ExecutionHarness, Mismatch, TestCase, Verifier};
use cmul_device::{DeviceError, DeviceKind, Platform, PlatformConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub device: DeviceKind,
    #[serde(default)]
    pub platform: PlatformConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            device: DeviceKind::Emulator,
            platform: PlatformConfig::default(),
        }
    }
}

/// Outcome of a run that reached a device.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub device: String,
    pub checks: usize,
    pub mismatches: Vec<Mismatch>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}

/// Execute every case on the configured device.
///
/// Environment failures (no device, kernel fault) abort the run and are
/// returned as errors. Mismatches are collected in the report and do not stop
/// later cases.
pub fn run(config: &RunConfig, cases: &[TestCase]) -> Result<RunReport, DeviceError> {
    let platform = Platform::discover(&config.platform);
    let device = platform.select(config.device)?;
    tracing::info!(vendor = %device.vendor, "Running on device: {}", device.name);

    let mut harness = ExecutionHarness::new(device)?;
    let mut verifier = Verifier::new();

    for case in cases {
        let found = harness.run_multiply(&case.a, &case.b, case.output)?;
        verifier.check(&case.label, &case.expected, &found);
    }

    Ok(RunReport {
        device: harness.device().name.clone(),
        checks: verifier.checks(),
        mismatches: verifier.into_mismatches(),
    })
}
