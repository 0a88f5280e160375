//! Linux bundlers: plain application image and Debian package.

pub mod app;
pub mod deb;
mod template;
