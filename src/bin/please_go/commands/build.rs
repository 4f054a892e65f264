//! `please_go build` command

use anyhow::Result;

use crate::cli::BuildArgs;
use please_go::ops::{build, BuildOptions};

pub fn execute(args: BuildArgs) -> Result<()> {
    let opts = BuildOptions {
        src_dir: args.src_dir,
        import_path: args.import_path,
        object_dir: args.object_dir,
        importcfg: args.importcfg,
        out: args.out,
        trimpath: args.trimpath,
        embedcfg: args.embedcfg,
        binary: args.binary,
        link_importcfg: args.link_importcfg,
        go_files: args.go_files,
        cgo_files: args.cgo_files,
        c_files: args.c_files,
        asm_files: args.asm_files,
        cflags: args.cflags,
        ldflags: args.ldflags,
        pkg_configs: args.pkg_configs,
    };

    let artifacts = build(&opts)?;
    tracing::info!("Built {}", artifacts.archive.display());
    if let Some(binary) = artifacts.binary {
        tracing::info!("Linked {}", binary.display());
    }
    Ok(())
}
