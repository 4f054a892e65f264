//! High-level operations.
//!
//! Each operation loads configuration for its source root and drives the
//! library components; the CLI commands are thin wrappers over these.

pub mod build;
pub mod generate;

pub use build::{build, go_version, BuildOptions};
pub use generate::{generate, GenerateOptions};
