use anyhow::{Context, Result};
use clap::Parser;
use cmul::{load_cases, reference_cases, run, RunConfig, RunReport};
use cmul_device::{DeviceError, DeviceKind, PlatformConfig};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

/// Multiply two fixed-point complex numbers on an accelerator device and
/// check the result.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Execution target: emulator, simulator or hardware
    #[arg(long, env = "CMUL_DEVICE", default_value = "emulator")]
    device: DeviceKind,

    /// Installed accelerator board (repeatable, or comma separated)
    #[arg(long = "board", env = "CMUL_BOARDS", value_delimiter = ',')]
    boards: Vec<String>,

    /// Latency the simulator adds to each kernel launch
    #[arg(long, default_value_t = 10)]
    simulator_latency_ms: u64,

    /// JSON case file. If omitted, runs the reference case.
    #[arg(long)]
    cases: Option<PathBuf>,
}

fn main() -> ExitCode {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match try_main(args) {
        Ok(report) if report.passed() => {
            println!("PASSED: kernel results are correct.");
            ExitCode::SUCCESS
        }
        Ok(report) => {
            println!(
                "FAILED ({} of {} checks mismatched)",
                report.mismatches.len(),
                report.checks
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            tracing::error!("{:#}", err);
            if let Some(DeviceError::DeviceNotFound(_)) = err.downcast_ref::<DeviceError>() {
                tracing::error!(
                    "If you are targeting an accelerator board, make sure it is installed and \
                     listed with --board or CMUL_BOARDS."
                );
                tracing::error!(
                    "To run without hardware, use --device emulator or --device simulator."
                );
            }
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> Result<RunReport> {
    let cases = match &args.cases {
        Some(path) => load_cases(path)
            .with_context(|| format!("loading cases from {}", path.display()))?,
        None => reference_cases().context("building reference case")?,
    };

    let config = RunConfig {
        device: args.device,
        platform: PlatformConfig {
            boards: args.boards,
            simulator_latency_ms: args.simulator_latency_ms,
        },
    };

    let report = run(&config, &cases).context("kernel execution failed")?;
    Ok(report)
}
