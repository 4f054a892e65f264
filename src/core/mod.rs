//! Core data model: modules, platforms, packages and rules.

pub mod module;
pub mod package;
pub mod platform;
pub mod rule;
pub mod scan;

pub use module::{ManifestError, ModuleManifest};
pub use package::{discover_package, Discovery, DiscoveryError, Package};
pub use platform::Platform;
pub use rule::{Rule, RuleKind};
