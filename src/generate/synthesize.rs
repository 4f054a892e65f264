//! Package -> rule synthesis.

use std::path::{Path, PathBuf};

use crate::core::{Package, Rule, RuleKind};
use crate::generate::resolver::{ImportResolver, ResolutionCache, ResolveError};

/// Turns discovered packages into build rules.
pub struct RuleSynthesizer<'a> {
    resolver: &'a ImportResolver,
    src_root: PathBuf,
}

impl<'a> RuleSynthesizer<'a> {
    pub fn new(resolver: &'a ImportResolver, src_root: impl Into<PathBuf>) -> Self {
        RuleSynthesizer {
            resolver,
            src_root: src_root.into(),
        }
    }

    /// Build the rule for a package, or `None` when it has no Go sources.
    pub fn synthesize(
        &self,
        pkg: &Package,
        cache: &mut ResolutionCache,
    ) -> Result<Option<Rule>, ResolveError> {
        if !pkg.has_go_sources() {
            return Ok(None);
        }

        let kind = RuleKind::select(pkg.is_command(), pkg.uses_cgo());
        let mut rule = Rule::new(self.rule_name(&pkg.dir), kind);

        rule.srcs = pkg.go_files.clone();
        rule.cgo_srcs = pkg.cgo_files.clone();
        if kind.is_cgo() {
            rule.c_srcs = pkg
                .c_files
                .iter()
                .chain(&pkg.cxx_files)
                .cloned()
                .collect();
        }
        rule.compiler_flags = pkg
            .cgo_cppflags
            .iter()
            .chain(&pkg.cgo_cflags)
            .cloned()
            .collect();
        rule.linker_flags = pkg.cgo_ldflags.clone();
        rule.pkg_configs = pkg.cgo_pkg_config.clone();
        rule.asm_srcs = pkg.asm_files.clone();
        rule.hdrs = pkg.header_files.clone();
        rule.embed_patterns = pkg.embed_patterns.clone();
        rule.deps = self.dep_targets(&pkg.imports, cache)?;

        Ok(Some(rule))
    }

    /// Resolve imports to targets, dropping the ones no module provides.
    pub fn dep_targets(
        &self,
        imports: &[String],
        cache: &mut ResolutionCache,
    ) -> Result<Vec<String>, ResolveError> {
        let mut deps = Vec::new();
        for import in imports {
            if let Some(target) = self.resolver.resolve(cache, import)? {
                deps.push(target);
            }
        }
        Ok(deps)
    }

    /// The rule name matches the directory it's in, or the basename of the
    /// module at the source root.
    ///
    /// # Panics
    ///
    /// Panics if the derived name is `"."`, which means the directory and
    /// source root disagree about where the tree is.
    pub fn rule_name(&self, dir: &Path) -> String {
        let base = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let name = if dir == self.src_root || base.is_empty() {
            let module = self.resolver.module().trim_end_matches('/');
            module.rsplit('/').next().unwrap_or(module).to_string()
        } else {
            base
        };

        assert!(
            name != ".",
            "derived rule name \".\" for {} (module {}, root {})",
            dir.display(),
            self.resolver.module(),
            self.src_root.display()
        );
        name
    }
}
