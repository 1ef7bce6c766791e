// src/generate/mod.rs

//! The transform step and the two build drivers.
//!
//! - [`generator`] owns the rules, runs the initial and incremental builds
//!   and turns each source file into its module-format variants.
//! - [`output`] names output files and wraps code in the generated banner.
//! - [`report`] holds the per-file outcome type returned to the drivers.

pub mod generator;
pub mod output;
pub mod report;

pub use generator::{failure_line, Generator};
pub use output::{output_path, wrap_generated, BANNER, FOOTER};
pub use report::{BuildKind, BuildReport, FileOutcome};
