//! Implementation of `please_go generate`.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::Platform;
use crate::generate::{GenerateSummary, Generator};
use crate::util::config::load_for_root;
use crate::util::fs::normalize_path;

/// Options for the generate command.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Root of the module source tree (holds go.mod)
    pub src_root: PathBuf,

    /// Modules to treat as known in addition to go.mod's requirements
    pub requirements: Vec<String>,
}

/// Generate `.plzconfig` and BUILD files for the module at `src_root`.
pub fn generate(opts: &GenerateOptions) -> Result<GenerateSummary> {
    if !opts.src_root.is_dir() {
        bail!("source root {} is not a directory", opts.src_root.display());
    }
    let src_root = normalize_path(&opts.src_root);

    let config = load_for_root(&src_root);
    let platform = Platform::from_config(&config.platform);
    tracing::debug!(
        "generating for {}/{} (cgo {})",
        platform.goos,
        platform.goarch,
        if platform.cgo_enabled { "on" } else { "off" }
    );

    Generator::new(src_root, platform)
        .with_requirements(opts.requirements.clone())
        .with_settings(config.generate)
        .run()
}
