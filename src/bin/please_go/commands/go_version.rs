//! `please_go go-version` command

use anyhow::Result;

use crate::cli::GoVersionArgs;
use please_go::ops::go_version;

pub fn execute(_args: GoVersionArgs) -> Result<()> {
    println!("{}", go_version()?);
    Ok(())
}
