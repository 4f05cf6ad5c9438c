//! upmanifest - generate update descriptors from build outputs.

pub mod build;
pub mod config;
pub mod schema;
pub mod validation;

pub use build::{assemble, run, run_plan, write_manifest};
pub use config::{BuildConfig, BuildPlan, Overrides};
