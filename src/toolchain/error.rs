//! Toolchain error types.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// A step of the package build, named in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Version,
    PkgConfig,
    Cgo,
    Symabis,
    Compile,
    CCompile,
    Asm,
    Pack,
    Link,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Version => "go version",
            Stage::PkgConfig => "pkg-config",
            Stage::Cgo => "cgo",
            Stage::Symabis => "symabis",
            Stage::Compile => "compile",
            Stage::CCompile => "C compile",
            Stage::Asm => "asm",
            Stage::Pack => "pack",
            Stage::Link => "link",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while driving the Go and C toolchains.
#[derive(Debug, Error)]
pub enum ToolchainError {
    /// The tool ran and exited unsuccessfully.
    #[error("{stage} failed: {command}\n{output}")]
    ToolFailed {
        stage: Stage,
        command: String,
        output: String,
    },

    /// The tool could not be started.
    #[error("{stage}: failed to run {command}: {message}")]
    Spawn {
        stage: Stage,
        command: String,
        message: String,
    },

    #[error("failed to query pkg-config for {}", .configs.join(" "))]
    PkgConfig {
        configs: Vec<String>,
        #[source]
        source: Box<ToolchainError>,
    },

    #[error("unrecognised go version output: {output:?}")]
    VersionParse { output: String },

    /// Two inputs map to the same object file.
    #[error("{first} and {second} both compile to {}", .object.display())]
    ArtifactCollision {
        object: PathBuf,
        first: String,
        second: String,
    },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ToolchainError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ToolchainError::Io {
            context: context.into(),
            source,
        }
    }

    /// The stage a tool failure happened in, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            ToolchainError::ToolFailed { stage, .. } | ToolchainError::Spawn { stage, .. } => {
                Some(*stage)
            }
            ToolchainError::PkgConfig { .. } => Some(Stage::PkgConfig),
            ToolchainError::VersionParse { .. } => Some(Stage::Version),
            ToolchainError::ArtifactCollision { .. } | ToolchainError::Io { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolchainError>;
