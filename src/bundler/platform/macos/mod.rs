//! macOS bundler: `.app` application bundle.

pub mod app;
mod template;
