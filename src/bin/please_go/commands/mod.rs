//! Command implementations

pub mod build;
pub mod generate;
pub mod go_version;
