//! Package discovery for a single directory.
//!
//! The result is explicitly tagged: a directory with no Go sources for the
//! active platform yields [`Discovery::NoBuildableSources`], which callers
//! treat as a skip. Every [`DiscoveryError`] is a real failure.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::platform::{ConstraintError, Platform};
use crate::core::scan::{self, ScanError};

/// Error discovering a package.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read directory {}", .dir.display())]
    ReadDir {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}", .file.display())]
    ReadFile {
        file: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .file.display())]
    Parse {
        file: PathBuf,
        #[source]
        source: ScanError,
    },

    #[error("{}: {source}", .file.display())]
    Constraint {
        file: PathBuf,
        #[source]
        source: ConstraintError,
    },

    #[error("found packages {first} ({first_file}) and {second} ({second_file}) in {}", .dir.display())]
    MultiplePackages {
        dir: PathBuf,
        first: String,
        first_file: String,
        second: String,
        second_file: String,
    },
}

/// Outcome of discovering one directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    Found(Package),
    /// Nothing to build here for this platform. Counts are informational.
    NoBuildableSources {
        dir: PathBuf,
        test_files: usize,
        excluded_files: usize,
    },
}

/// A Go package as seen by the build: its files partitioned by role, cgo
/// flags and imports. File names are relative to `dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub dir: PathBuf,
    pub name: String,
    /// Pure Go sources
    pub go_files: Vec<String>,
    /// Go sources that import "C"
    pub cgo_files: Vec<String>,
    pub c_files: Vec<String>,
    pub cxx_files: Vec<String>,
    /// Assembly sources (`.s`, `.S`)
    pub asm_files: Vec<String>,
    pub header_files: Vec<String>,
    pub embed_patterns: Vec<String>,
    pub cgo_cppflags: Vec<String>,
    pub cgo_cflags: Vec<String>,
    pub cgo_ldflags: Vec<String>,
    pub cgo_pkg_config: Vec<String>,
    /// Sorted, unique; never contains "C"
    pub imports: Vec<String>,
}

impl Package {
    /// A package named `main` builds a binary.
    pub fn is_command(&self) -> bool {
        self.name == "main"
    }

    pub fn uses_cgo(&self) -> bool {
        !self.cgo_files.is_empty()
    }

    pub fn has_go_sources(&self) -> bool {
        !self.go_files.is_empty() || !self.cgo_files.is_empty()
    }
}

#[derive(Clone, Copy)]
enum FileKind {
    Go,
    C,
    Cxx,
    Asm,
    Header,
}

fn classify(name: &str) -> Option<FileKind> {
    let ext = Path::new(name).extension()?.to_str()?;
    match ext {
        "go" => Some(FileKind::Go),
        "c" => Some(FileKind::C),
        "cc" | "cpp" | "cxx" => Some(FileKind::Cxx),
        "s" | "S" => Some(FileKind::Asm),
        "h" | "hh" | "hpp" | "hxx" => Some(FileKind::Header),
        _ => None,
    }
}

/// Discover the package in `dir` for the given platform.
pub fn discover_package(dir: &Path, platform: &Platform) -> Result<Discovery, DiscoveryError> {
    let read_dir = |source| DiscoveryError::ReadDir {
        dir: dir.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_dir)? {
        let entry = entry.map_err(read_dir)?;
        if entry.file_type().map_err(read_dir)?.is_file() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();

    let mut pkg = Package {
        dir: dir.to_path_buf(),
        ..Package::default()
    };
    let mut first_file = String::new();
    let mut imports = BTreeSet::new();
    let mut embeds = BTreeSet::new();
    let mut test_files = 0;
    let mut excluded_files = 0;

    for name in names {
        if name.starts_with('_') || name.starts_with('.') {
            continue;
        }
        let Some(kind) = classify(&name) else {
            continue;
        };
        if name.ends_with("_test.go") {
            test_files += 1;
            continue;
        }
        if !platform.matches_file_name(&name) {
            excluded_files += 1;
            continue;
        }

        let path = dir.join(&name);
        let bytes = std::fs::read(&path).map_err(|source| DiscoveryError::ReadFile {
            file: path.clone(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);

        if !matches!(kind, FileKind::Go) {
            let constraint = scan::scan_leading_constraint(&text).map_err(|source| {
                DiscoveryError::Parse {
                    file: path.clone(),
                    source,
                }
            })?;
            if !satisfies(platform, constraint.as_deref(), &path)? {
                excluded_files += 1;
                continue;
            }
            match kind {
                FileKind::C => pkg.c_files.push(name),
                FileKind::Cxx => pkg.cxx_files.push(name),
                FileKind::Asm => pkg.asm_files.push(name),
                FileKind::Header => pkg.header_files.push(name),
                FileKind::Go => {}
            }
            continue;
        }

        let header = scan::scan_go_source(&text).map_err(|source| DiscoveryError::Parse {
            file: path.clone(),
            source,
        })?;
        if !satisfies(platform, header.build_constraint.as_deref(), &path)? {
            excluded_files += 1;
            continue;
        }
        if header.imports_c() && !platform.cgo_enabled {
            excluded_files += 1;
            continue;
        }
        if header.package == "documentation" {
            continue;
        }

        if pkg.name.is_empty() {
            pkg.name = header.package.clone();
            first_file = name.clone();
        } else if pkg.name != header.package {
            return Err(DiscoveryError::MultiplePackages {
                dir: dir.to_path_buf(),
                first: pkg.name,
                first_file,
                second: header.package,
                second_file: name,
            });
        }

        if header.imports_c() {
            if let Some(preamble) = header.cgo_preamble.as_deref() {
                apply_cgo_directives(&mut pkg, preamble, platform, &path)?;
            }
            pkg.cgo_files.push(name);
        } else {
            pkg.go_files.push(name);
        }

        imports.extend(header.imports.into_iter().filter(|i| i != "C"));
        embeds.extend(header.embed_patterns);
    }

    if !pkg.has_go_sources() {
        return Ok(Discovery::NoBuildableSources {
            dir: dir.to_path_buf(),
            test_files,
            excluded_files,
        });
    }

    pkg.imports = imports.into_iter().collect();
    pkg.embed_patterns = embeds.into_iter().collect();
    Ok(Discovery::Found(pkg))
}

fn satisfies(platform: &Platform, constraint: Option<&str>, file: &Path) -> Result<bool, DiscoveryError> {
    match constraint {
        None => Ok(true),
        Some(expr) => platform
            .eval_build_expr(expr)
            .map_err(|source| DiscoveryError::Constraint {
                file: file.to_path_buf(),
                source,
            }),
    }
}

fn apply_cgo_directives(
    pkg: &mut Package,
    preamble: &str,
    platform: &Platform,
    file: &Path,
) -> Result<(), DiscoveryError> {
    let directives = scan::parse_cgo_directives(preamble).map_err(|source| DiscoveryError::Parse {
        file: file.to_path_buf(),
        source,
    })?;
    let srcdir = pkg.dir.to_string_lossy().into_owned();

    for directive in directives {
        let constraints: Vec<&str> = directive.constraints.iter().map(String::as_str).collect();
        if !platform.matches_cgo_constraints(&constraints) {
            continue;
        }
        let args = directive
            .args
            .iter()
            .map(|arg| arg.replace("${SRCDIR}", &srcdir));
        match directive.verb.as_str() {
            "CFLAGS" => pkg.cgo_cflags.extend(args),
            "CPPFLAGS" => pkg.cgo_cppflags.extend(args),
            "LDFLAGS" => pkg.cgo_ldflags.extend(args),
            "pkg-config" => pkg.cgo_pkg_config.extend(args),
            other => tracing::debug!("ignoring #cgo {} in {}", other, file.display()),
        }
    }
    Ok(())
}
