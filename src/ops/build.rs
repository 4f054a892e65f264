//! Implementation of `please_go build`.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::Platform;
use crate::toolchain::{detect_toolchain, BuildArtifacts, LinkRequest, PackageBuild, Pipeline, Toolchain};
use crate::util::config::{load_for_root, Config};

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Directory holding the package sources
    pub src_dir: PathBuf,

    /// Import path of the package being built
    pub import_path: String,

    /// Scratch directory for generated files and objects
    pub object_dir: PathBuf,

    /// Import config for the compile step
    pub importcfg: PathBuf,

    /// Archive to write (defaults to `<object-dir>/<last import path element>.a`)
    pub out: Option<PathBuf>,

    pub trimpath: Option<String>,
    pub embedcfg: Option<PathBuf>,

    /// Link the archive into this executable
    pub binary: Option<PathBuf>,

    /// Import config for the link step (defaults to the compile one)
    pub link_importcfg: Option<PathBuf>,

    pub go_files: Vec<String>,
    pub cgo_files: Vec<String>,
    pub c_files: Vec<String>,
    pub asm_files: Vec<String>,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
    pub pkg_configs: Vec<String>,
}

impl BuildOptions {
    fn to_package_build(&self) -> PackageBuild {
        let mut pkg = PackageBuild::new(
            &self.import_path,
            &self.src_dir,
            &self.object_dir,
            &self.importcfg,
        );
        pkg.archive = self.out.clone();
        pkg.go_files = self.go_files.clone();
        pkg.cgo_files = self.cgo_files.clone();
        pkg.c_files = self.c_files.clone();
        pkg.asm_files = self.asm_files.clone();
        pkg.cflags = self.cflags.clone();
        pkg.ldflags = self.ldflags.clone();
        pkg.pkg_configs = self.pkg_configs.clone();
        pkg.trimpath = self.trimpath.clone();
        pkg.embedcfg = self.embedcfg.clone();
        pkg.link = self.binary.as_ref().map(|out| LinkRequest {
            importcfg: self.link_importcfg.clone().unwrap_or_else(|| self.importcfg.clone()),
            out: out.clone(),
        });
        pkg
    }
}

/// Configuration for commands run from the current directory.
fn current_config() -> Config {
    let cwd = std::env::current_dir().unwrap_or_default();
    load_for_root(&cwd)
}

fn toolchain_for(config: &Config) -> Result<Toolchain> {
    detect_toolchain(&config.toolchain, &Platform::from_config(&config.platform))
}

/// Build one package with the detected toolchain.
pub fn build(opts: &BuildOptions) -> Result<BuildArtifacts> {
    let toolchain = toolchain_for(&current_config())?;
    build_with(&toolchain, opts)
}

/// Build one package with the given toolchain.
pub fn build_with(toolchain: &Toolchain, opts: &BuildOptions) -> Result<BuildArtifacts> {
    if opts.go_files.is_empty() && opts.cgo_files.is_empty() {
        anyhow::bail!("no Go sources given for {}", display_name(opts));
    }
    let pkg = opts.to_package_build();
    Pipeline::new(toolchain)
        .build(&pkg)
        .with_context(|| format!("failed to build {}", display_name(opts)))
}

fn display_name(opts: &BuildOptions) -> String {
    if opts.import_path.is_empty() {
        opts.src_dir.display().to_string()
    } else {
        opts.import_path.clone()
    }
}

/// The minor version of the detected go tool.
pub fn go_version() -> Result<u64> {
    let toolchain = toolchain_for(&current_config())?;
    toolchain
        .go_minor_version()
        .with_context(|| format!("failed to query {}", toolchain.go_tool().display()))
}
