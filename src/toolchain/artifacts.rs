//! Names of the files the build stages produce inside the object directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::toolchain::error::{Result, ToolchainError};

/// Go declarations generated by cgo for the C side of a package.
pub const CGO_GOTYPES: &str = "_cgo_gotypes.go";
/// C glue for functions exported from Go.
pub const CGO_EXPORT_C: &str = "_cgo_export.c";
/// Assembly header the compiler writes for assembly sources to include.
pub const ASM_HEADER: &str = "go_asm.h";
/// Symbol ABI table extracted from assembly sources.
pub const SYMABIS: &str = "symabis";

fn file_name(src: &Path) -> String {
    src.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// `foo.go` -> `foo`
fn go_base(src: &Path) -> String {
    let name = file_name(src);
    name.strip_suffix(".go").unwrap_or(&name).to_string()
}

/// The Go file cgo rewrites a cgo source into.
pub fn cgo_go_output(object_dir: &Path, cgo_src: &Path) -> PathBuf {
    object_dir.join(format!("{}.cgo1.go", go_base(cgo_src)))
}

/// The C file cgo extracts from a cgo source.
pub fn cgo_c_output(object_dir: &Path, cgo_src: &Path) -> PathBuf {
    object_dir.join(format!("{}.cgo2.c", go_base(cgo_src)))
}

/// The object file a C or assembly source compiles to: its base name with
/// the final extension replaced by `.o`.
pub fn object_for(object_dir: &Path, src: &Path) -> PathBuf {
    let stem = src
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    object_dir.join(format!("{stem}.o"))
}

/// The archive name for a package: the last import path element.
pub fn archive_for(object_dir: &Path, import_path: &str) -> PathBuf {
    let base = import_path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    let base = if base.is_empty() { "pkg" } else { base };
    object_dir.join(format!("{base}.a"))
}

/// Fail if two sources would overwrite each other's object file.
pub fn check_collisions<'a>(
    object_dir: &Path,
    sources: impl IntoIterator<Item = &'a Path>,
) -> Result<()> {
    let mut seen: HashMap<PathBuf, &Path> = HashMap::new();
    for src in sources {
        let object = object_for(object_dir, src);
        if let Some(first) = seen.get(&object) {
            return Err(ToolchainError::ArtifactCollision {
                object,
                first: first.display().to_string(),
                second: src.display().to_string(),
            });
        }
        seen.insert(object, src);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cgo_outputs() {
        let obj = Path::new("/obj");
        assert_eq!(cgo_go_output(obj, Path::new("png.go")), Path::new("/obj/png.cgo1.go"));
        assert_eq!(cgo_c_output(obj, Path::new("/src/png.go")), Path::new("/obj/png.cgo2.c"));
    }

    #[test]
    fn test_object_names() {
        let obj = Path::new("/obj");
        assert_eq!(object_for(obj, Path::new("shim.c")), Path::new("/obj/shim.o"));
        assert_eq!(object_for(obj, Path::new("/obj/png.cgo2.c")), Path::new("/obj/png.cgo2.o"));
        assert_eq!(object_for(obj, Path::new("fast_amd64.s")), Path::new("/obj/fast_amd64.o"));
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(archive_for(Path::new("/obj"), "example.com/lib/png"), Path::new("/obj/png.a"));
        assert_eq!(archive_for(Path::new("/obj"), ""), Path::new("/obj/pkg.a"));
    }

    #[test]
    fn test_collision_detected() {
        let err = check_collisions(
            Path::new("/obj"),
            [Path::new("util.c"), Path::new("x.c"), Path::new("util.s")],
        )
        .unwrap_err();
        match err {
            ToolchainError::ArtifactCollision { object, first, second } => {
                assert_eq!(object, Path::new("/obj/util.o"));
                assert_eq!(first, "util.c");
                assert_eq!(second, "util.s");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
