//! # cmul
//!
//! Runs the exact fixed-point complex multiply as a single task on an
//! accelerator device and verifies the result.
//!
//! - [`ComplexMultiplyKernel`]: the operation object bound to staged buffers
//! - [`ExecutionHarness`]: stage → dispatch → synchronize → read back
//! - [`Verifier`]: aggregates expected/found comparisons into one verdict
//! - [`TestCase`]: reference scenario plus JSON-loaded cases
//! - [`run`]: select a device, execute every case, produce a [`RunReport`]

pub mod cases;
pub mod harness;
pub mod kernel;
pub mod run;
pub mod verify;

pub use cases::{load_cases, reference_cases, CaseError, CaseFile, CaseSpec, OperandSpec, TestCase};
pub use harness::ExecutionHarness;
pub use kernel::ComplexMultiplyKernel;
pub use run::{run, RunConfig, RunReport};
pub use verify::{Mismatch, Verifier};
