use crate::DeviceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Class of execution target.
///
/// - **Emulator**: runs kernels directly on a host thread
/// - **Simulator**: like the emulator, plus a modelled execution latency
/// - **Hardware**: an accelerator board; only present when one is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Emulator,
    Simulator,
    Hardware,
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceKind::Emulator => write!(f, "emulator"),
            DeviceKind::Simulator => write!(f, "simulator"),
            DeviceKind::Hardware => write!(f, "hardware"),
        }
    }
}

impl FromStr for DeviceKind {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "emulator" | "emu" => Ok(DeviceKind::Emulator),
            "simulator" | "sim" => Ok(DeviceKind::Simulator),
            "hardware" | "hw" | "board" => Ok(DeviceKind::Hardware),
            other => Err(DeviceError::UnknownDeviceKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub kind: DeviceKind,
    /// Human-readable name, reported when a run starts
    pub name: String,
    pub vendor: String,
    /// Modelled time spent per kernel launch
    pub latency: Duration,
}

/// Environment description used by [`Platform::discover`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    /// Names of installed accelerator boards. Empty means no hardware.
    #[serde(default)]
    pub boards: Vec<String>,
    /// Latency the simulator adds to every kernel launch
    #[serde(default)]
    pub simulator_latency_ms: u64,
}

/// The set of devices visible to this process.
#[derive(Debug, Clone)]
pub struct Platform {
    devices: Vec<DeviceInfo>,
}

impl Platform {
    /// Enumerate devices.
    ///
    /// The emulator and simulator are always available. One hardware device
    /// is reported per configured board.
    pub fn discover(config: &PlatformConfig) -> Self {
        let mut devices = vec![
            DeviceInfo {
                kind: DeviceKind::Emulator,
                name: "cmul CPU emulation device".to_string(),
                vendor: "cmul".to_string(),
                latency: Duration::ZERO,
            },
            DeviceInfo {
                kind: DeviceKind::Simulator,
                name: "cmul cycle simulator".to_string(),
                vendor: "cmul".to_string(),
                latency: Duration::from_millis(config.simulator_latency_ms),
            },
        ];

        for board in &config.boards {
            devices.push(DeviceInfo {
                kind: DeviceKind::Hardware,
                name: board.clone(),
                vendor: "board".to_string(),
                latency: Duration::ZERO,
            });
        }

        tracing::debug!(
            count = devices.len(),
            boards = config.boards.len(),
            "discovered devices"
        );

        Self { devices }
    }

    /// Build a platform from an explicit device list
    pub fn from_devices(devices: Vec<DeviceInfo>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[DeviceInfo] {
        &self.devices
    }

    /// First device of the requested kind.
    pub fn select(&self, kind: DeviceKind) -> Result<DeviceInfo, DeviceError> {
        self.devices
            .iter()
            .find(|d| d.kind == kind)
            .cloned()
            .ok_or(DeviceError::DeviceNotFound(kind))
    }
}
