//! please_go - BUILD file generation and package builds for Go
//!
//! This crate turns a Go module source tree into Please BUILD files (one
//! rule per package, with dependencies resolved against the module's
//! requirements) and drives the Go and C toolchains to compile and link
//! individual packages.

pub mod core;
pub mod generate;
pub mod ops;
pub mod toolchain;
pub mod util;

/// Test utilities and mocks for unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a mock process executor.
#[cfg(test)]
pub mod test_support;

pub use core::{ModuleManifest, Package, Platform, Rule, RuleKind};
pub use generate::{Generator, ImportResolver, ResolutionCache};
pub use toolchain::{Pipeline, Toolchain};
