//! BUILD file generation for a Go module source tree.
//!
//! One run reads `go.mod`, writes the `.plzconfig` plugin declaration, then
//! walks the tree writing a BUILD file into every directory that yields a
//! rule.

pub mod build_file;
pub mod resolver;
pub mod synthesize;
pub mod walker;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::core::{ModuleManifest, Platform};
use crate::util::config::GenerateConfig;
use crate::util::fs::{relative_path, slash_path, write_string};

pub use build_file::{render_build_file, render_plzconfig};
pub use resolver::{ImportResolver, ResolutionCache, ResolveError};
pub use synthesize::RuleSynthesizer;
pub use walker::{DirOutcome, PackageWalker, SkipReason};

/// What a generation run produced.
#[derive(Debug, Clone, Default)]
pub struct GenerateSummary {
    pub module: String,
    /// BUILD files written, in walk order
    pub build_files: Vec<PathBuf>,
    pub skipped_dirs: usize,
    pub resolved_imports: usize,
}

/// Generates BUILD files for a module.
#[derive(Debug, Clone)]
pub struct Generator {
    src_root: PathBuf,
    requirements: Vec<String>,
    platform: Platform,
    settings: GenerateConfig,
}

impl Generator {
    pub fn new(src_root: impl Into<PathBuf>, platform: Platform) -> Self {
        Generator {
            src_root: src_root.into(),
            requirements: Vec::new(),
            platform,
            settings: GenerateConfig::default(),
        }
    }

    /// Modules known in addition to the ones `go.mod` requires.
    pub fn with_requirements(mut self, requirements: Vec<String>) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn with_settings(mut self, settings: GenerateConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn src_root(&self) -> &Path {
        &self.src_root
    }

    /// Run generation over the whole source tree.
    pub fn run(&self) -> Result<GenerateSummary> {
        let manifest_path = self.src_root.join("go.mod");
        let manifest = ModuleManifest::load(&manifest_path)?;
        tracing::info!(
            "Generating BUILD files for {} ({} requirements)",
            manifest.module,
            manifest.requires.len()
        );

        self.write_config(&manifest.module)?;

        let resolver = ImportResolver::from_manifest(&manifest, &self.requirements)
            .with_third_party_dir(self.settings.third_party_dir.clone());
        let synthesizer = RuleSynthesizer::new(&resolver, &self.src_root);
        let walker = PackageWalker::new(&self.src_root, &self.platform, &synthesizer);
        let mut cache = ResolutionCache::new();

        let mut summary = GenerateSummary {
            module: manifest.module.clone(),
            ..GenerateSummary::default()
        };

        for outcome in walker.walk(&mut cache)? {
            match outcome {
                DirOutcome::RuleProduced { dir, rule } => {
                    tracing::debug!(
                        "//{}:{} is a {}",
                        slash_path(&relative_path(&self.src_root, &dir)),
                        rule.name,
                        rule.kind
                    );
                    let path = dir.join(&self.settings.build_file_name);
                    write_string(&path, &render_build_file(std::slice::from_ref(&rule)))?;
                    summary.build_files.push(path);
                }
                DirOutcome::Skipped { .. } => summary.skipped_dirs += 1,
            }
        }
        summary.resolved_imports = cache.len();

        tracing::info!(
            "Wrote {} BUILD file(s), skipped {} director{}",
            summary.build_files.len(),
            summary.skipped_dirs,
            if summary.skipped_dirs == 1 { "y" } else { "ies" }
        );
        Ok(summary)
    }

    fn write_config(&self, module: &str) -> Result<()> {
        let path = self.src_root.join(".plzconfig");
        write_string(&path, &render_plzconfig(&self.settings.plugin_target, module))
            .with_context(|| format!("failed to write plugin config for {}", module))
    }
}
