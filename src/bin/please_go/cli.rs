//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// please_go - BUILD file generation and package builds for Go
#[derive(Parser)]
#[command(name = "please_go")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate .plzconfig and BUILD files for a Go module
    Generate(GenerateArgs),

    /// Compile (and optionally link) a single Go package
    Build(BuildArgs),

    /// Print the minor version of the go tool
    GoVersion(GoVersionArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Root of the module source tree
    #[arg(long, default_value = ".")]
    pub src_root: PathBuf,

    /// Extra module known to be available (repeatable)
    #[arg(long = "requirement", value_name = "MODULE")]
    pub requirements: Vec<String>,
}

#[derive(Args)]
pub struct BuildArgs {
    /// Directory holding the package sources
    #[arg(long, default_value = ".")]
    pub src_dir: PathBuf,

    /// Import path of the package
    #[arg(long, default_value = "")]
    pub import_path: String,

    /// Directory for generated files and objects
    #[arg(long)]
    pub object_dir: PathBuf,

    /// Import config for compilation
    #[arg(long)]
    pub importcfg: PathBuf,

    /// Archive to produce
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Prefix to remove from recorded source paths
    #[arg(long)]
    pub trimpath: Option<String>,

    /// Embed config for //go:embed
    #[arg(long)]
    pub embedcfg: Option<PathBuf>,

    /// Link the package into this executable
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// Import config for linking (defaults to --importcfg)
    #[arg(long)]
    pub link_importcfg: Option<PathBuf>,

    /// Go source file
    #[arg(long = "go", value_name = "FILE")]
    pub go_files: Vec<String>,

    /// Go source file importing "C"
    #[arg(long = "cgo", value_name = "FILE")]
    pub cgo_files: Vec<String>,

    /// C source file
    #[arg(long = "c", value_name = "FILE")]
    pub c_files: Vec<String>,

    /// Go assembly source file
    #[arg(long = "asm", value_name = "FILE")]
    pub asm_files: Vec<String>,

    /// C compiler flag
    #[arg(long = "cflag", value_name = "FLAG", allow_hyphen_values = true)]
    pub cflags: Vec<String>,

    /// Linker flag
    #[arg(long = "ldflag", value_name = "FLAG", allow_hyphen_values = true)]
    pub ldflags: Vec<String>,

    /// pkg-config package to take flags from
    #[arg(long = "pkg-config", value_name = "NAME")]
    pub pkg_configs: Vec<String>,
}

#[derive(Args)]
pub struct GoVersionArgs {}
