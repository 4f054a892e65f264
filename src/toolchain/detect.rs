//! Toolchain detection.

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::core::Platform;
use crate::util::config::ToolchainSettings;
use crate::util::process::{find_c_compiler, find_executable, find_go, find_pkg_config};

use super::Toolchain;

/// Resolve a configured tool: a path is used as-is, a bare name is looked up
/// on `PATH`.
fn configured(tool: &Option<PathBuf>) -> Option<PathBuf> {
    let tool = tool.as_ref()?;
    if tool.components().count() > 1 {
        return Some(tool.clone());
    }
    find_executable(&tool.to_string_lossy()).or_else(|| Some(tool.clone()))
}

/// Detect the tools to build with.
///
/// Priority for each tool:
/// 1. Config file setting (`[toolchain]`), already merged with `GO`, `CC`
///    and `PKG_CONFIG` from the environment
/// 2. The first matching program on `PATH`
///
/// A missing go tool is an error. The C compiler and pkg-config fall back to
/// `cc` and `pkg-config` so packages that never use them still build.
pub fn detect_toolchain(settings: &ToolchainSettings, platform: &Platform) -> Result<Toolchain> {
    let Some(go) = configured(&settings.go).or_else(find_go) else {
        bail!(
            "no go tool found\n\
             \n\
             Set the GO environment variable, configure `go` under [toolchain]\n\
             in .please_go/config.toml, or put go on PATH."
        )
    };
    let cc = configured(&settings.cc)
        .or_else(find_c_compiler)
        .unwrap_or_else(|| PathBuf::from("cc"));
    let pkg_config = configured(&settings.pkg_config)
        .or_else(find_pkg_config)
        .unwrap_or_else(|| PathBuf::from("pkg-config"));

    tracing::debug!(
        "using go {}, cc {}, pkg-config {}",
        go.display(),
        cc.display(),
        pkg_config.display()
    );
    Ok(Toolchain::new(go, cc, pkg_config).with_platform(platform))
}
