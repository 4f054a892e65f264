//! `please_go generate` command

use anyhow::Result;

use crate::cli::GenerateArgs;
use please_go::ops::{generate, GenerateOptions};

pub fn execute(args: GenerateArgs) -> Result<()> {
    let opts = GenerateOptions {
        src_root: args.src_root,
        requirements: args.requirements,
    };
    let summary = generate(&opts)?;

    for path in &summary.build_files {
        println!("{}", path.display());
    }
    Ok(())
}
