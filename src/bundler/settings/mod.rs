//! Bundle configuration.
//!
//! [`BundleParams`] is the single parameter object every bundler consumes;
//! [`runtime`] holds the JRE location checks and runtime subsetting.

mod params;
pub mod runtime;

pub use params::BundleParams;

/// Operating system a bundle targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum TargetOs {
    Linux,
    MacOs,
    Windows,
}

impl TargetOs {
    /// The OS this process is running on.
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            TargetOs::MacOs
        } else if cfg!(target_os = "windows") {
            TargetOs::Windows
        } else {
            TargetOs::Linux
        }
    }
}

impl std::fmt::Display for TargetOs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetOs::Linux => write!(f, "linux"),
            TargetOs::MacOs => write!(f, "macos"),
            TargetOs::Windows => write!(f, "windows"),
        }
    }
}
