//! The packaging pipeline.
//!
//! Leaf-first: [`fileset`] and [`rules`] model the runtime subset,
//! [`resources`] resolves overridable templates and launchers, [`jar`]
//! derives the main-jar facts, [`settings`] holds the parameter object,
//! [`platform`] contains the concrete bundlers and [`builder`] orchestrates
//! a packaging run.

pub mod builder;
pub mod error;
pub mod fileset;
pub mod jar;
pub mod platform;
pub mod resources;
pub mod rules;
pub mod settings;
pub mod utils;

// Re-export the types a packaging run touches
pub use builder::{Applicability, BundledArtifact, PackagingRun};
pub use error::{Context, Error, ErrorExt, Result};
pub use fileset::RelativeFileSet;
pub use jar::MainJarInfo;
pub use platform::{BundleType, BundlerKind};
pub use resources::ResourceLocator;
pub use rules::{Action, Pattern, Rule};
pub use settings::{BundleParams, TargetOs};
