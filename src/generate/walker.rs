//! Depth-first source tree walk.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::core::{discover_package, Discovery, Platform, Rule};
use crate::generate::resolver::ResolutionCache;
use crate::generate::synthesize::RuleSynthesizer;

/// Directories with this name hold test fixtures and are never visited.
pub const TEST_FIXTURE_DIR: &str = "testdata";

/// Why a directory produced no rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No Go sources for the active platform.
    NoBuildableSources {
        test_files: usize,
        excluded_files: usize,
    },
    /// A package was found but has nothing to build.
    NoRule,
}

/// Result of visiting one directory. Fatal problems are returned as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirOutcome {
    RuleProduced { dir: PathBuf, rule: Rule },
    Skipped { dir: PathBuf, reason: SkipReason },
}

impl DirOutcome {
    pub fn dir(&self) -> &Path {
        match self {
            DirOutcome::RuleProduced { dir, .. } | DirOutcome::Skipped { dir, .. } => dir,
        }
    }

    pub fn rule(&self) -> Option<&Rule> {
        match self {
            DirOutcome::RuleProduced { rule, .. } => Some(rule),
            DirOutcome::Skipped { .. } => None,
        }
    }
}

/// Walks a source tree, discovering and synthesizing one package per
/// directory.
pub struct PackageWalker<'a> {
    root: PathBuf,
    platform: &'a Platform,
    synthesizer: &'a RuleSynthesizer<'a>,
}

impl<'a> PackageWalker<'a> {
    pub fn new(
        root: impl Into<PathBuf>,
        platform: &'a Platform,
        synthesizer: &'a RuleSynthesizer<'a>,
    ) -> Self {
        PackageWalker {
            root: root.into(),
            platform,
            synthesizer,
        }
    }

    /// Visit every directory under the root, in sorted depth-first order.
    ///
    /// The first fatal error aborts the walk.
    pub fn walk(&self, cache: &mut ResolutionCache) -> Result<Vec<DirOutcome>> {
        let mut outcomes = Vec::new();

        let walker = WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == TEST_FIXTURE_DIR));

        for entry in walker {
            let entry = entry
                .with_context(|| format!("failed to walk {}", self.root.display()))?;
            if !entry.file_type().is_dir() {
                continue;
            }
            outcomes.push(self.visit_dir(entry.path(), cache)?);
        }

        Ok(outcomes)
    }

    /// Discover and synthesize the package in a single directory.
    pub fn visit_dir(&self, dir: &Path, cache: &mut ResolutionCache) -> Result<DirOutcome> {
        let pkg = match discover_package(dir, self.platform)? {
            Discovery::Found(pkg) => pkg,
            Discovery::NoBuildableSources {
                dir,
                test_files,
                excluded_files,
            } => {
                tracing::debug!("no buildable Go sources in {}", dir.display());
                return Ok(DirOutcome::Skipped {
                    dir,
                    reason: SkipReason::NoBuildableSources {
                        test_files,
                        excluded_files,
                    },
                });
            }
        };

        let rule = self
            .synthesizer
            .synthesize(&pkg, cache)
            .with_context(|| format!("failed to resolve imports of {}", dir.display()))?;

        Ok(match rule {
            Some(rule) => {
                tracing::debug!("{} {} in {}", rule.kind, rule.name, dir.display());
                DirOutcome::RuleProduced {
                    dir: dir.to_path_buf(),
                    rule,
                }
            }
            None => DirOutcome::Skipped {
                dir: dir.to_path_buf(),
                reason: SkipReason::NoRule,
            },
        })
    }
}
