//! Native application bundler library.
//!
//! Takes a built JVM application plus an optional embedded runtime image and
//! produces platform-native artifacts:
//! - app images (Linux directory, macOS .app, Windows directory)
//! - installers (.deb via dpkg-deb, .msi via WiX candle/light, .exe via Inno Setup)
//!
//! The caller populates a [`bundler::BundleParams`], opens a
//! [`bundler::PackagingRun`], asks it for the applicable bundlers and lets it
//! drive each one. External packaging compilers are invoked as child
//! processes; the pipeline itself is strictly sequential.

pub mod bundler;
pub mod error;

// Re-export commonly used types
pub use error::{BundleError, Result};
