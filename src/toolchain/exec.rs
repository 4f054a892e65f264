//! Command execution seam.

use anyhow::Result;

use crate::toolchain::command::CommandSpec;

/// Captured result of running a tool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub status: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Stdout followed by stderr, trimmed.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.trim_end().to_string();
        let err = self.stderr.trim_end();
        if !err.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(err);
        }
        out
    }
}

/// Runs commands. Errors mean the command could not be run at all; a tool
/// that ran and failed is reported through [`ToolOutput::status`].
pub trait Executor: Send + Sync {
    fn execute(&self, cmd: &CommandSpec) -> Result<ToolOutput>;
}

/// Executes commands as real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&self, cmd: &CommandSpec) -> Result<ToolOutput> {
        let output = cmd.to_process().exec()?;
        Ok(ToolOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
