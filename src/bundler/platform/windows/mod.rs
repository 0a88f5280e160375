//! Windows bundlers: application image, MSI installer, Inno Setup installer.

pub mod app;
pub mod exe;
pub mod msi;
