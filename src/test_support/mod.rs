//! Test utilities and mocks for unit tests.
//!
//! [`MockExecutor`] stands in for the real process executor so toolchain
//! stages can be tested without Go or a C compiler installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use please_go::test_support::{MockExecutor, MockProcessOutput};
//!
//! let exec = MockExecutor::new();
//! exec.expect_prefix("go version", MockProcessOutput::success("go version go1.22.1 linux/amd64"));
//! ```

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{bail, Result};

use crate::toolchain::command::CommandSpec;
use crate::toolchain::exec::{Executor, ToolOutput};

/// Mock process output for testing command execution.
#[derive(Debug, Clone)]
pub struct MockProcessOutput {
    /// Exit status code (0 = success).
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl MockProcessOutput {
    /// Create a successful output with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        MockProcessOutput {
            status: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Create a failure output with the given stderr and status code.
    pub fn failure(status: i32, stderr: impl Into<String>) -> Self {
        MockProcessOutput {
            status,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    fn to_tool_output(&self) -> ToolOutput {
        ToolOutput {
            status: Some(self.status),
            stdout: self.stdout.clone(),
            stderr: self.stderr.clone(),
        }
    }
}

impl Default for MockProcessOutput {
    fn default() -> Self {
        MockProcessOutput::success("")
    }
}

/// Pattern for matching commands in MockExecutor.
#[derive(Debug, Clone)]
pub enum CommandPattern {
    /// Exact match on full command string.
    Exact(String),
    /// Match if command starts with prefix.
    StartsWith(String),
    /// Match if command contains substring.
    Contains(String),
    /// Match using a regex pattern.
    Regex(String),
    /// Match any command.
    Any,
}

impl CommandPattern {
    /// Check if this pattern matches the given command.
    pub fn matches(&self, cmd: &str) -> bool {
        match self {
            CommandPattern::Exact(s) => cmd == s,
            CommandPattern::StartsWith(s) => cmd.starts_with(s),
            CommandPattern::Contains(s) => cmd.contains(s),
            CommandPattern::Regex(pattern) => regex::Regex::new(pattern)
                .map(|re| re.is_match(cmd))
                .unwrap_or(false),
            CommandPattern::Any => true,
        }
    }
}

#[derive(Debug, Clone)]
struct CommandExpectation {
    pattern: CommandPattern,
    output: MockProcessOutput,
    times: Option<usize>,
    used: usize,
}

impl CommandExpectation {
    fn available(&self) -> bool {
        match self.times {
            Some(n) => self.used < n,
            None => true,
        }
    }
}

/// A command the mock saw.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// The displayed command line, including any `(cd dir; ...)` prefix.
    pub command: String,
    pub spec: CommandSpec,
    /// Contents of any `@file` arguments, read at call time.
    pub args_files: Vec<String>,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: Vec<CommandExpectation>,
    calls: Vec<RecordedCall>,
    default_output: Option<MockProcessOutput>,
}

/// Mock process executor.
///
/// Commands are matched against expectations in the order they were added;
/// an unmatched command fails unless a default output is set.
#[derive(Debug, Default)]
pub struct MockExecutor {
    state: Mutex<MockState>,
}

impl MockExecutor {
    pub fn new() -> Self {
        MockExecutor::default()
    }

    fn push(&self, pattern: CommandPattern, output: MockProcessOutput, times: Option<usize>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push(CommandExpectation {
            pattern,
            output,
            times,
            used: 0,
        });
    }

    /// Add an expectation for an exact command match.
    pub fn expect(&self, cmd: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Exact(cmd.to_string()), output, None);
        self
    }

    /// Add an expectation for a command starting with a prefix.
    pub fn expect_prefix(&self, prefix: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::StartsWith(prefix.to_string()), output, None);
        self
    }

    /// Add an expectation for a command containing a substring.
    pub fn expect_contains(&self, substring: &str, output: MockProcessOutput) -> &Self {
        self.push(CommandPattern::Contains(substring.to_string()), output, None);
        self
    }

    /// Add an expectation that matches at most `times` commands.
    pub fn expect_times(&self, pattern: CommandPattern, output: MockProcessOutput, times: usize) -> &Self {
        self.push(pattern, output, Some(times));
        self
    }

    /// Set a default output for commands that don't match any expectation.
    pub fn set_default(&self, output: MockProcessOutput) -> &Self {
        self.state.lock().unwrap().default_output = Some(output);
        self
    }

    /// All commands that were called, as displayed strings.
    pub fn calls(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.calls.iter().map(|c| c.command.clone()).collect()
    }

    /// All calls with their full details.
    pub fn recorded(&self) -> Vec<RecordedCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Verify that all counted expectations were used exactly as often as
    /// declared.
    pub fn verify(&self) -> Result<()> {
        let state = self.state.lock().unwrap();
        for (i, exp) in state.expectations.iter().enumerate() {
            if let Some(expected) = exp.times {
                if exp.used != expected {
                    bail!(
                        "expectation {} was used {} times, expected {}",
                        i,
                        exp.used,
                        expected
                    );
                }
            }
        }
        Ok(())
    }
}

impl Executor for MockExecutor {
    fn execute(&self, cmd: &CommandSpec) -> Result<ToolOutput> {
        let command = cmd.display();
        let args_files = cmd
            .args
            .iter()
            .filter_map(|a| a.strip_prefix('@'))
            .filter_map(|p| fs::read_to_string(Path::new(p)).ok())
            .collect();

        let mut state = self.state.lock().unwrap();
        state.calls.push(RecordedCall {
            command: command.clone(),
            spec: cmd.clone(),
            args_files,
        });

        for exp in state.expectations.iter_mut() {
            if exp.pattern.matches(&command) && exp.available() {
                exp.used += 1;
                return Ok(exp.output.to_tool_output());
            }
        }

        if let Some(ref default) = state.default_output {
            return Ok(default.to_tool_output());
        }

        bail!("unexpected command: {}", command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_matching() {
        assert!(CommandPattern::Exact("go version".into()).matches("go version"));
        assert!(!CommandPattern::Exact("go version".into()).matches("go version -m"));
        assert!(CommandPattern::StartsWith("go tool".into()).matches("go tool pack r a.a"));
        assert!(CommandPattern::Contains("-gensymabis".into()).matches("go tool asm -gensymabis"));
        assert!(CommandPattern::Regex(r"^cc .* -o \S+\.o".into()).matches("cc -c -o obj/a.o a.c"));
        assert!(CommandPattern::Any.matches("anything"));
    }

    #[test]
    fn test_expectations_in_order() {
        let exec = MockExecutor::new();
        exec.expect_times(
            CommandPattern::StartsWith("cc".into()),
            MockProcessOutput::success(""),
            1,
        );
        exec.expect_prefix("cc", MockProcessOutput::failure(1, "boom"));

        assert!(exec.execute(&CommandSpec::new("cc").arg("a.c")).unwrap().success());
        let second = exec.execute(&CommandSpec::new("cc").arg("b.c")).unwrap();
        assert_eq!(second.stderr, "boom");
        assert_eq!(exec.calls(), vec!["cc a.c", "cc b.c"]);
        exec.verify().unwrap();
    }

    #[test]
    fn test_unexpected_command() {
        let exec = MockExecutor::new();
        let err = exec.execute(&CommandSpec::new("ld")).unwrap_err();
        assert!(err.to_string().contains("unexpected command: ld"));
    }
}
