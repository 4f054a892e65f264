//! Stage sequencing for one package build.
//!
//! Stages run in a fixed order, each only when the package needs it:
//!
//! ```text
//! pkg-config -> cgo -> symabis -> compile -> C compile -> asm -> pack -> link
//! ```
//!
//! The first failing stage aborts the build; later stages never run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::toolchain::artifacts;
use crate::toolchain::error::{Result, ToolchainError};
use crate::toolchain::{AsmHeaders, CompileRequest, Toolchain};
use crate::util::fs::absolute;

/// Final link step for a command package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRequest {
    pub importcfg: PathBuf,
    pub out: PathBuf,
}

/// Everything needed to build one package.
///
/// Source file names are relative to `source_dir`. Relative directories
/// are taken from the current directory when the build starts.
#[derive(Debug, Clone, Default)]
pub struct PackageBuild {
    pub import_path: String,
    pub source_dir: PathBuf,
    pub object_dir: PathBuf,
    pub importcfg: PathBuf,
    /// Archive to produce; derived from the import path when unset.
    pub archive: Option<PathBuf>,
    pub go_files: Vec<String>,
    pub cgo_files: Vec<String>,
    pub c_files: Vec<String>,
    pub asm_files: Vec<String>,
    pub cflags: Vec<String>,
    pub ldflags: Vec<String>,
    pub pkg_configs: Vec<String>,
    pub trimpath: Option<String>,
    pub embedcfg: Option<PathBuf>,
    pub link: Option<LinkRequest>,
}

impl PackageBuild {
    pub fn new(
        import_path: impl Into<String>,
        source_dir: impl Into<PathBuf>,
        object_dir: impl Into<PathBuf>,
        importcfg: impl Into<PathBuf>,
    ) -> Self {
        PackageBuild {
            import_path: import_path.into(),
            source_dir: source_dir.into(),
            object_dir: object_dir.into(),
            importcfg: importcfg.into(),
            ..PackageBuild::default()
        }
    }

    /// The same build with every directory and output made absolute
    /// against `cwd`.
    pub fn absolute_against(&self, cwd: &Path) -> PackageBuild {
        let abs = |p: &PathBuf| absolute(cwd, p);
        PackageBuild {
            source_dir: abs(&self.source_dir),
            object_dir: abs(&self.object_dir),
            importcfg: abs(&self.importcfg),
            archive: self.archive.as_ref().map(abs),
            embedcfg: self.embedcfg.as_ref().map(abs),
            link: self.link.as_ref().map(|link| LinkRequest {
                importcfg: abs(&link.importcfg),
                out: abs(&link.out),
            }),
            ..self.clone()
        }
    }

    pub fn archive_path(&self) -> PathBuf {
        self.archive
            .clone()
            .unwrap_or_else(|| artifacts::archive_for(&self.object_dir, &self.import_path))
    }
}

/// What a successful build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArtifacts {
    pub archive: PathBuf,
    /// Go and C files cgo generated
    pub generated: Vec<PathBuf>,
    pub asm_headers: Option<AsmHeaders>,
    /// Objects packed into the archive
    pub objects: Vec<PathBuf>,
    pub binary: Option<PathBuf>,
}

/// Runs the build stages for a package.
#[derive(Debug)]
pub struct Pipeline<'a> {
    toolchain: &'a Toolchain,
}

impl<'a> Pipeline<'a> {
    pub fn new(toolchain: &'a Toolchain) -> Self {
        Pipeline { toolchain }
    }

    /// Run every stage the package needs. cgo and the C compiler run inside
    /// the source directory, so paths are made absolute first.
    pub fn build(&self, pkg: &PackageBuild) -> Result<BuildArtifacts> {
        let cwd = std::env::current_dir()
            .map_err(|e| ToolchainError::io("failed to read the current directory", e))?;
        let pkg = &pkg.absolute_against(&cwd);
        let tc = self.toolchain;
        let object_dir = &pkg.object_dir;
        let source_dir = &pkg.source_dir;

        fs::create_dir_all(object_dir).map_err(|e| {
            ToolchainError::io(format!("failed to create {}", object_dir.display()), e)
        })?;
        self.check_objects(pkg)?;

        let mut artifacts = BuildArtifacts {
            archive: pkg.archive_path(),
            ..BuildArtifacts::default()
        };

        let mut cflags = pkg.cflags.clone();
        let mut ldflags = pkg.ldflags.clone();
        if !pkg.pkg_configs.is_empty() {
            cflags.extend(tc.pkg_config_cflags(&pkg.pkg_configs)?);
            ldflags.extend(tc.pkg_config_ldflags(&pkg.pkg_configs)?);
        }

        let mut go_srcs: Vec<PathBuf> = pkg.go_files.iter().map(|f| source_dir.join(f)).collect();
        let mut c_srcs: Vec<PathBuf> = pkg.c_files.iter().map(PathBuf::from).collect();

        if !pkg.cgo_files.is_empty() {
            tracing::info!("Running cgo for {}", pkg.import_path);
            let cgo = tc.cgo(source_dir, object_dir, &cflags, &pkg.cgo_files)?;
            artifacts.generated.extend(cgo.go_files.iter().cloned());
            artifacts.generated.extend(cgo.c_files.iter().cloned());
            go_srcs.extend(cgo.go_files);
            c_srcs.extend(cgo.c_files);
        }

        let asm_srcs: Vec<PathBuf> = pkg.asm_files.iter().map(|f| source_dir.join(f)).collect();
        if !asm_srcs.is_empty() {
            artifacts.asm_headers = Some(tc.symabis(&pkg.import_path, object_dir, &asm_srcs)?);
        }

        tracing::info!("Compiling {} ({} Go files)", pkg.import_path, go_srcs.len());
        tc.compile(&CompileRequest {
            import_path: pkg.import_path.clone(),
            importcfg: pkg.importcfg.clone(),
            out: artifacts.archive.clone(),
            trimpath: pkg.trimpath.clone(),
            embedcfg: pkg.embedcfg.clone(),
            asm: artifacts.asm_headers.clone(),
            files: go_srcs,
        })?;

        artifacts
            .objects
            .extend(tc.c_compile(source_dir, object_dir, &c_srcs, &cflags)?);
        artifacts.objects.extend(tc.asm(
            &pkg.import_path,
            object_dir,
            pkg.trimpath.as_deref(),
            &asm_srcs,
        )?);

        if !artifacts.objects.is_empty() {
            tc.pack(&artifacts.archive, &artifacts.objects)?;
        }

        if let Some(ref link) = pkg.link {
            tracing::info!("Linking {}", link.out.display());
            tc.link(&artifacts.archive, &link.importcfg, &link.out, &ldflags)?;
            artifacts.binary = Some(link.out.clone());
        }

        Ok(artifacts)
    }

    /// Reject builds where two sources, including the ones cgo will
    /// generate, would write the same object file.
    fn check_objects(&self, pkg: &PackageBuild) -> Result<()> {
        let object_dir = &pkg.object_dir;
        let mut sources: Vec<PathBuf> = pkg.c_files.iter().map(PathBuf::from).collect();
        if !pkg.cgo_files.is_empty() {
            sources.push(object_dir.join(artifacts::CGO_EXPORT_C));
            sources.extend(
                pkg.cgo_files
                    .iter()
                    .map(|f| artifacts::cgo_c_output(object_dir, Path::new(f))),
            );
        }
        sources.extend(pkg.asm_files.iter().map(PathBuf::from));
        artifacts::check_collisions(object_dir, sources.iter().map(PathBuf::as_path))
    }
}
