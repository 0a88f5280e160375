//! Shared file system and process helpers.

pub mod fs;
pub mod process;
