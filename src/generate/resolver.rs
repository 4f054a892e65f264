//! Import path to build target resolution.
//!
//! An import path resolves against the modules the source tree knows about:
//! replace directives first, then the longest module path that prefixes the
//! import. Imports that match no module (the standard library, or anything
//! genuinely missing) resolve to nothing and are left for the compiler to
//! report.
//!
//! Results are memoized in a [`ResolutionCache`] owned by the caller. The
//! resolver itself is immutable; the cache has a single writer. Callers
//! resolving from several threads must wrap the cache in a `Mutex`.

use std::collections::HashMap;

use thiserror::Error;

use crate::core::ModuleManifest;

/// Error resolving an import path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error("replace directives form a cycle: {}", .chain.join(" => "))]
    ReplaceCycle { chain: Vec<String> },
}

/// Memoized import path -> target reference mappings.
///
/// Only successful resolutions are stored, so a later resolver with more
/// module knowledge may still resolve a path that failed before.
#[derive(Debug, Clone, Default)]
pub struct ResolutionCache {
    targets: HashMap<String, String>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, import_path: &str) -> Option<&str> {
        self.targets.get(import_path).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn insert(&mut self, import_path: &str, target: &str) {
        self.targets
            .insert(import_path.to_string(), target.to_string());
    }
}

/// Maps import paths to Please build targets.
#[derive(Debug, Clone)]
pub struct ImportResolver {
    /// Identity of the module being generated; its packages are local.
    module: String,
    /// Known module paths, in the order they were declared.
    modules: Vec<String>,
    replace: HashMap<String, String>,
    third_party_dir: String,
}

impl ImportResolver {
    pub fn new(
        module: impl Into<String>,
        modules: Vec<String>,
        replace: HashMap<String, String>,
    ) -> Self {
        ImportResolver {
            module: module.into(),
            modules,
            replace,
            third_party_dir: "third_party/go".to_string(),
        }
    }

    /// Seed a resolver from a manifest. `extra` requirements (supplied on
    /// the command line) come before the manifest's own.
    pub fn from_manifest(manifest: &ModuleManifest, extra: &[String]) -> Self {
        let mut modules = extra.to_vec();
        modules.extend(manifest.required_modules());
        ImportResolver::new(manifest.module.clone(), modules, manifest.replace.clone())
    }

    /// Set the directory third-party subrepos live under.
    pub fn with_third_party_dir(mut self, dir: impl Into<String>) -> Self {
        self.third_party_dir = dir.into().trim_matches('/').to_string();
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Resolve an import path to a target reference.
    ///
    /// `Ok(None)` means the import is not provided by any known module.
    pub fn resolve(
        &self,
        cache: &mut ResolutionCache,
        import_path: &str,
    ) -> Result<Option<String>, ResolveError> {
        let mut chain = Vec::new();
        self.resolve_chain(cache, import_path, &mut chain)
    }

    fn resolve_chain(
        &self,
        cache: &mut ResolutionCache,
        import_path: &str,
        chain: &mut Vec<String>,
    ) -> Result<Option<String>, ResolveError> {
        if let Some(target) = cache.get(import_path) {
            return Ok(Some(target.to_string()));
        }

        if let Some(replacement) = self.replace.get(import_path) {
            if chain.iter().any(|p| p == import_path) {
                let mut cycle = std::mem::take(chain);
                cycle.push(import_path.to_string());
                return Err(ResolveError::ReplaceCycle { chain: cycle });
            }
            chain.push(import_path.to_string());

            let target = self.resolve_chain(cache, replacement, chain)?;
            if let Some(ref target) = target {
                cache.insert(import_path, target);
            }
            return Ok(target);
        }

        let Some(module) = self.longest_module(import_path) else {
            return Ok(None);
        };

        let target = self.target_for(module, import_path);
        cache.insert(import_path, &target);
        Ok(Some(target))
    }

    /// The longest known module path prefixing `import_path`. Two matches
    /// of equal length are the same string, so ties cannot change the
    /// result; the first one declared is kept.
    fn longest_module(&self, import_path: &str) -> Option<&str> {
        let mut best: Option<&str> = None;
        for module in &self.modules {
            if import_path.starts_with(module.as_str())
                && best.map_or(true, |b| b.len() < module.len())
            {
                best = Some(module);
            }
        }
        best
    }

    fn target_for(&self, module: &str, import_path: &str) -> String {
        let rest = &import_path[module.len()..];
        let package = rest.strip_prefix('/').unwrap_or(rest);

        if module == self.module {
            return if package.is_empty() {
                format!("//:{}", basename(module))
            } else {
                format!("//{}:{}", package, basename(package))
            };
        }

        let subrepo = module.replace('/', "_");
        if package.is_empty() {
            format!(
                "///{}/{}//:{}",
                self.third_party_dir,
                subrepo,
                basename(module)
            )
        } else {
            format!(
                "///{}/{}//{}:{}",
                self.third_party_dir,
                subrepo,
                package,
                basename(package)
            )
        }
    }
}

fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}
