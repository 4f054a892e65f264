//! Structured external commands.
//!
//! Every stage builds a [`CommandSpec`]: a program, an argument vector and
//! a working directory. Nothing is composed into a shell string, so file
//! names never need quoting.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::util::process::ProcessBuilder;

/// A command to execute, with program, arguments, environment and working
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The program to run (e.g., "go", "cc")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Environment variables to set
    pub env: Vec<(String, String)>,
    /// Working directory; the caller's when unset
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add a path argument.
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add a flag followed by its value, when there is a value.
    pub fn opt_arg(self, flag: &str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(v) => self.arg(flag).arg(v),
            None => self,
        }
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Run the command in the given directory.
    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Convert to a process builder for execution.
    pub fn to_process(&self) -> ProcessBuilder {
        let mut pb = ProcessBuilder::new(&self.program).args(&self.args);
        for (key, value) in &self.env {
            pb = pb.env(key, value);
        }
        if let Some(ref cwd) = self.cwd {
            pb = pb.cwd(cwd);
        }
        pb
    }

    /// Human-readable command line, for logs and errors.
    pub fn display(&self) -> String {
        self.to_process().display_command()
    }
}

/// A temporary response file holding one argument per line, passed to a
/// tool as `@<path>` to stay clear of command-line length limits.
///
/// The file is deleted when this value is dropped, on success and failure
/// paths alike; deletion errors are ignored.
#[derive(Debug)]
pub struct ArgsFile {
    file: NamedTempFile,
}

impl ArgsFile {
    pub fn create(args: &[String]) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("please_go")
            .suffix(".args")
            .tempfile()?;
        file.write_all(args.join("\n").as_bytes())?;
        file.flush()?;
        Ok(ArgsFile { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// The `@path` argument referring to this file.
    pub fn token(&self) -> String {
        format!("@{}", self.path().display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_spec_builder() {
        let cmd = CommandSpec::new("go")
            .args(["tool", "compile"])
            .opt_arg("-p", Some("example.com/x"))
            .opt_arg("-trimpath", None::<String>)
            .path_arg(Path::new("/tmp/a.go"))
            .cwd("/src");

        assert_eq!(
            cmd.args,
            vec!["tool", "compile", "-p", "example.com/x", "/tmp/a.go"]
        );
        assert_eq!(cmd.display(), "(cd /src; go tool compile -p example.com/x /tmp/a.go)");
    }

    #[test]
    fn test_args_file_lifecycle() {
        let args = vec!["/src/a.go".to_string(), "/src/b go.go".to_string()];
        let file = ArgsFile::create(&args).unwrap();
        let path = file.path().to_path_buf();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "/src/a.go\n/src/b go.go");
        assert_eq!(file.token(), format!("@{}", path.display()));

        drop(file);
        assert!(!path.exists());
    }
}
