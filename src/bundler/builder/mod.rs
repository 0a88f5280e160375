//! Packaging-run orchestration.
//!
//! A [`PackagingRun`] owns all per-run state; bundler selection, validation
//! and sequential execution live in [`orchestrator`].

pub mod checksum;
mod orchestrator;
pub mod tool_detection;

pub use orchestrator::{
    Applicability, BundleFailure, BundledArtifact, PackagingRun, RunOutcome, bundle_all,
    candidates, validate,
};
