//! Go and C toolchain driver.
//!
//! [`Toolchain`] knows how to invoke each tool (`go tool cgo`, `go tool
//! compile`, `cc`, `go tool asm`, `go tool pack`, `go tool link`,
//! `pkg-config`). Every invocation goes through an [`Executor`], so the
//! stage logic can be tested against a mock. [`pipeline::Pipeline`] sequences
//! the stages for one package.

pub mod artifacts;
pub mod command;
pub mod detect;
pub mod error;
pub mod exec;
pub mod pipeline;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, OnceLock};

use regex::Regex;
use semver::Version;

use crate::core::Platform;
use crate::util::fs::touch;

pub use command::{ArgsFile, CommandSpec};
pub use detect::detect_toolchain;
pub use error::{Stage, ToolchainError};
pub use exec::{Executor, ProcessExecutor, ToolOutput};
pub use pipeline::{BuildArtifacts, LinkRequest, PackageBuild, Pipeline};

use error::Result;

static GO_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"go version go(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// Parse the output of `go version`.
///
/// Prereleases such as `go1.23rc1` report patch 0.
pub fn parse_go_version(output: &str) -> Result<Version> {
    let caps = GO_VERSION
        .captures(output)
        .ok_or_else(|| ToolchainError::VersionParse {
            output: output.trim().to_string(),
        })?;
    let num = |i: usize| -> Result<u64> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().map_err(|_| ToolchainError::VersionParse {
                output: output.trim().to_string(),
            }),
            None => Ok(0),
        }
    };
    Ok(Version::new(num(1)?, num(2)?, num(3)?))
}

/// Tool features that depend on the Go release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// The assembler accepts `-p <import path>`.
    pub asm_import_path: bool,
}

impl Capabilities {
    pub fn for_version(version: &Version) -> Self {
        Capabilities {
            asm_import_path: *version >= Version::new(1, 19, 0),
        }
    }
}

/// Files cgo generated for a package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CgoOutputs {
    pub go_files: Vec<PathBuf>,
    pub c_files: Vec<PathBuf>,
}

/// Files produced by symbol extraction for assembly sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsmHeaders {
    /// Placeholder the compiler overwrites with the real header.
    pub asm_header: PathBuf,
    pub symabis: PathBuf,
}

/// Inputs to a Go compile.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    pub import_path: String,
    pub importcfg: PathBuf,
    pub out: PathBuf,
    pub trimpath: Option<String>,
    pub embedcfg: Option<PathBuf>,
    pub asm: Option<AsmHeaders>,
    pub files: Vec<PathBuf>,
}

/// The tools used to build Go packages.
pub struct Toolchain {
    go_tool: PathBuf,
    cc_tool: PathBuf,
    pkg_config_tool: PathBuf,
    goos: String,
    goarch: String,
    executor: Arc<dyn Executor>,
    version: OnceLock<Version>,
}

impl fmt::Debug for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Toolchain")
            .field("go_tool", &self.go_tool)
            .field("cc_tool", &self.cc_tool)
            .field("pkg_config_tool", &self.pkg_config_tool)
            .field("goos", &self.goos)
            .field("goarch", &self.goarch)
            .field("version", &self.version.get())
            .finish()
    }
}

impl Toolchain {
    /// A toolchain for the host platform that runs real processes.
    pub fn new(
        go_tool: impl Into<PathBuf>,
        cc_tool: impl Into<PathBuf>,
        pkg_config_tool: impl Into<PathBuf>,
    ) -> Self {
        let host = Platform::host();
        Toolchain {
            go_tool: go_tool.into(),
            cc_tool: cc_tool.into(),
            pkg_config_tool: pkg_config_tool.into(),
            goos: host.goos,
            goarch: host.goarch,
            executor: Arc::new(ProcessExecutor),
            version: OnceLock::new(),
        }
    }

    pub fn with_executor(mut self, executor: Arc<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    /// Target a platform other than the host.
    pub fn with_platform(mut self, platform: &Platform) -> Self {
        self.goos = platform.goos.clone();
        self.goarch = platform.goarch.clone();
        self
    }

    /// Use a known Go version instead of asking the go tool.
    pub fn with_version(self, version: Version) -> Self {
        let _ = self.version.set(version);
        self
    }

    pub fn go_tool(&self) -> &Path {
        &self.go_tool
    }

    pub fn cc_tool(&self) -> &Path {
        &self.cc_tool
    }

    /// GOROOT, taken to be two levels above the go tool (`<root>/bin/go`).
    pub fn root(&self) -> PathBuf {
        self.go_tool
            .parent()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    fn go_tool_cmd(&self, tool: &str) -> CommandSpec {
        CommandSpec::new(&self.go_tool).arg("tool").arg(tool)
    }

    /// Run a command, turning a spawn failure or unsuccessful exit into a
    /// stage error.
    fn run(&self, stage: Stage, cmd: &CommandSpec) -> Result<ToolOutput> {
        let command = cmd.display();
        tracing::debug!("{}: {}", stage, command);

        let output = self
            .executor
            .execute(cmd)
            .map_err(|e| ToolchainError::Spawn {
                stage,
                command: command.clone(),
                message: format!("{:#}", e),
            })?;

        if !output.success() {
            return Err(ToolchainError::ToolFailed {
                stage,
                command,
                output: output.combined(),
            });
        }
        Ok(output)
    }

    /// The version of the go tool, queried once.
    pub fn go_version(&self) -> Result<Version> {
        if let Some(v) = self.version.get() {
            return Ok(v.clone());
        }
        let cmd = CommandSpec::new(&self.go_tool).arg("version");
        let output = self.run(Stage::Version, &cmd)?;
        let version = parse_go_version(&output.stdout)?;
        tracing::debug!("go tool {} is version {}", self.go_tool.display(), version);
        let _ = self.version.set(version.clone());
        Ok(version)
    }

    /// The Go minor release, e.g. 22 for go1.22.3.
    pub fn go_minor_version(&self) -> Result<u64> {
        Ok(self.go_version()?.minor)
    }

    pub fn capabilities(&self) -> Result<Capabilities> {
        Ok(Capabilities::for_version(&self.go_version()?))
    }

    /// Compiler flags for the given pkg-config packages.
    pub fn pkg_config_cflags(&self, configs: &[String]) -> Result<Vec<String>> {
        self.pkg_config("--cflags", configs)
    }

    /// Linker flags for the given pkg-config packages.
    pub fn pkg_config_ldflags(&self, configs: &[String]) -> Result<Vec<String>> {
        self.pkg_config("--libs", configs)
    }

    fn pkg_config(&self, mode: &str, configs: &[String]) -> Result<Vec<String>> {
        if configs.is_empty() {
            return Ok(Vec::new());
        }
        let cmd = CommandSpec::new(&self.pkg_config_tool)
            .arg(mode)
            .args(configs.iter().cloned());
        let output = self
            .run(Stage::PkgConfig, &cmd)
            .map_err(|e| ToolchainError::PkgConfig {
                configs: configs.to_vec(),
                source: Box::new(e),
            })?;
        Ok(output.stdout.split_whitespace().map(str::to_string).collect())
    }

    /// Run cgo over the package's cgo sources.
    ///
    /// `files` are names relative to `source_dir`, where cgo runs.
    pub fn cgo(
        &self,
        source_dir: &Path,
        object_dir: &Path,
        cflags: &[String],
        files: &[String],
    ) -> Result<CgoOutputs> {
        let cmd = self
            .go_tool_cmd("cgo")
            .arg("-objdir")
            .path_arg(object_dir)
            .arg("--")
            .arg("-I")
            .path_arg(object_dir)
            .args(cflags.iter().cloned())
            .args(files.iter().cloned())
            .cwd(source_dir);
        self.run(Stage::Cgo, &cmd)?;

        let mut outputs = CgoOutputs {
            go_files: vec![object_dir.join(artifacts::CGO_GOTYPES)],
            c_files: vec![object_dir.join(artifacts::CGO_EXPORT_C)],
        };
        for file in files {
            let src = Path::new(file);
            outputs.go_files.push(artifacts::cgo_go_output(object_dir, src));
            outputs.c_files.push(artifacts::cgo_c_output(object_dir, src));
        }
        Ok(outputs)
    }

    /// Extract the symbol ABI table from assembly sources.
    ///
    /// Also writes an empty assembly header, since the sources may include it
    /// before the compiler has produced the real one.
    pub fn symabis(
        &self,
        import_path: &str,
        object_dir: &Path,
        files: &[PathBuf],
    ) -> Result<AsmHeaders> {
        let headers = AsmHeaders {
            asm_header: object_dir.join(artifacts::ASM_HEADER),
            symabis: object_dir.join(artifacts::SYMABIS),
        };
        touch(&headers.asm_header).map_err(|e| {
            ToolchainError::io(format!("failed to create {}", headers.asm_header.display()), e)
        })?;

        let cmd = self
            .asm_cmd(import_path, object_dir)?
            .arg("-gensymabis")
            .arg("-o")
            .path_arg(&headers.symabis)
            .args(files.iter().map(|f| f.display().to_string()));
        self.run(Stage::Symabis, &cmd)?;
        Ok(headers)
    }

    fn asm_cmd(&self, import_path: &str, object_dir: &Path) -> Result<CommandSpec> {
        let include = self.root().join("pkg").join("include");
        let mut cmd = self.go_tool_cmd("asm");
        if !import_path.is_empty() && self.capabilities()?.asm_import_path {
            cmd = cmd.arg("-p").arg(import_path);
        }
        Ok(cmd
            .arg("-I")
            .path_arg(object_dir)
            .arg("-I")
            .path_arg(&include)
            .arg("-D")
            .arg(format!("GOOS_{}", self.goos))
            .arg("-D")
            .arg(format!("GOARCH_{}", self.goarch)))
    }

    /// Compile Go sources into an archive. The source list is passed through
    /// a temporary args file.
    pub fn compile(&self, req: &CompileRequest) -> Result<()> {
        let files: Vec<String> = req.files.iter().map(|f| f.display().to_string()).collect();
        let args_file = ArgsFile::create(&files)
            .map_err(|e| ToolchainError::io("failed to write compiler args file", e))?;

        let mut cmd = self.go_tool_cmd("compile").arg("-pack");
        if !req.import_path.is_empty() {
            cmd = cmd.arg("-p").arg(&req.import_path);
        }
        cmd = cmd
            .opt_arg("-trimpath", req.trimpath.clone())
            .opt_arg("-embedcfg", req.embedcfg.as_ref().map(|p| p.display().to_string()))
            .arg("-importcfg")
            .path_arg(&req.importcfg);
        if let Some(ref asm) = req.asm {
            cmd = cmd
                .arg("-asmhdr")
                .path_arg(&asm.asm_header)
                .arg("-symabis")
                .path_arg(&asm.symabis);
        }
        let cmd = cmd.arg("-o").path_arg(&req.out).arg(args_file.token());

        self.run(Stage::Compile, &cmd)?;
        Ok(())
    }

    /// Compile C sources one at a time, stopping at the first failure.
    /// Returns the object files in source order.
    pub fn c_compile(
        &self,
        source_dir: &Path,
        object_dir: &Path,
        files: &[PathBuf],
        cflags: &[String],
    ) -> Result<Vec<PathBuf>> {
        let mut objects = Vec::with_capacity(files.len());
        for file in files {
            let object = artifacts::object_for(object_dir, file);
            let cmd = CommandSpec::new(&self.cc_tool)
                .args(["-Wno-error", "-Wno-unused-parameter", "-c"])
                .args(cflags.iter().cloned())
                .args(["-I", "."])
                .arg("-o")
                .path_arg(&object)
                .path_arg(file)
                .cwd(source_dir);
            self.run(Stage::CCompile, &cmd)?;
            objects.push(object);
        }
        Ok(objects)
    }

    /// Assemble Go assembly sources, one object per source.
    pub fn asm(
        &self,
        import_path: &str,
        object_dir: &Path,
        trimpath: Option<&str>,
        files: &[PathBuf],
    ) -> Result<Vec<PathBuf>> {
        let mut objects = Vec::with_capacity(files.len());
        for file in files {
            let object = artifacts::object_for(object_dir, file);
            let cmd = self
                .asm_cmd(import_path, object_dir)?
                .opt_arg("-trimpath", trimpath)
                .arg("-o")
                .path_arg(&object)
                .path_arg(file);
            self.run(Stage::Asm, &cmd)?;
            objects.push(object);
        }
        Ok(objects)
    }

    /// Append object files to an archive.
    pub fn pack(&self, archive: &Path, objects: &[PathBuf]) -> Result<()> {
        let cmd = self
            .go_tool_cmd("pack")
            .arg("r")
            .path_arg(archive)
            .args(objects.iter().map(|o| o.display().to_string()));
        self.run(Stage::Pack, &cmd)?;
        Ok(())
    }

    /// Link an archive into an executable, with the C compiler as the
    /// external linker.
    pub fn link(
        &self,
        archive: &Path,
        importcfg: &Path,
        out: &Path,
        ldflags: &[String],
    ) -> Result<()> {
        let mut cmd = self
            .go_tool_cmd("link")
            .arg("-extld")
            .path_arg(&self.cc_tool);
        if !ldflags.is_empty() {
            cmd = cmd.arg("-extldflags").arg(ldflags.join(" "));
        }
        let cmd = cmd
            .arg("-importcfg")
            .path_arg(importcfg)
            .arg("-o")
            .path_arg(out)
            .path_arg(archive);
        self.run(Stage::Link, &cmd)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MockExecutor, MockProcessOutput};
    use tempfile::TempDir;

    fn toolchain(exec: &Arc<MockExecutor>) -> Toolchain {
        Toolchain::new("/goroot/bin/go", "cc", "pkg-config")
            .with_executor(exec.clone())
            .with_platform(&Platform::new("linux", "amd64"))
    }

    #[test]
    fn test_parse_go_version() {
        assert_eq!(
            parse_go_version("go version go1.22.3 linux/amd64").unwrap(),
            Version::new(1, 22, 3)
        );
        assert_eq!(
            parse_go_version("go version go1.21 darwin/arm64\n").unwrap(),
            Version::new(1, 21, 0)
        );
        assert_eq!(
            parse_go_version("go version go1.23rc1 linux/amd64").unwrap(),
            Version::new(1, 23, 0)
        );
        assert!(matches!(
            parse_go_version("gccgo 13"),
            Err(ToolchainError::VersionParse { .. })
        ));
    }

    #[test]
    fn test_capabilities() {
        assert!(!Capabilities::for_version(&Version::new(1, 18, 10)).asm_import_path);
        assert!(Capabilities::for_version(&Version::new(1, 19, 0)).asm_import_path);
    }

    #[test]
    fn test_root() {
        let exec = Arc::new(MockExecutor::new());
        assert_eq!(toolchain(&exec).root(), PathBuf::from("/goroot"));
    }

    #[test]
    fn test_go_version_queried_once() {
        let exec = Arc::new(MockExecutor::new());
        exec.expect(
            "/goroot/bin/go version",
            MockProcessOutput::success("go version go1.20.5 linux/amd64\n"),
        );
        let tc = toolchain(&exec);

        assert_eq!(tc.go_minor_version().unwrap(), 20);
        assert_eq!(tc.go_minor_version().unwrap(), 20);
        assert_eq!(exec.calls().len(), 1);
    }

    #[test]
    fn test_pkg_config_flags() {
        let exec = Arc::new(MockExecutor::new());
        exec.expect(
            "pkg-config --cflags libpng zlib",
            MockProcessOutput::success("-I/usr/include/libpng16 \n"),
        );
        exec.expect(
            "pkg-config --libs libpng zlib",
            MockProcessOutput::success("-lpng16 -lz\n"),
        );
        let tc = toolchain(&exec);
        let configs = vec!["libpng".to_string(), "zlib".to_string()];

        assert_eq!(tc.pkg_config_cflags(&configs).unwrap(), vec!["-I/usr/include/libpng16"]);
        assert_eq!(tc.pkg_config_ldflags(&configs).unwrap(), vec!["-lpng16", "-lz"]);
        assert!(tc.pkg_config_ldflags(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_pkg_config_failure_names_configs() {
        let exec = Arc::new(MockExecutor::new());
        exec.expect_prefix(
            "pkg-config",
            MockProcessOutput::failure(1, "Package nope was not found"),
        );
        let err = toolchain(&exec)
            .pkg_config_cflags(&["nope".to_string()])
            .unwrap_err();

        assert!(err.to_string().contains("nope"));
        match err {
            ToolchainError::PkgConfig { configs, source } => {
                assert_eq!(configs, vec!["nope"]);
                assert!(source.to_string().contains("was not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cgo_command_and_outputs() {
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let tc = toolchain(&exec);

        let outputs = tc
            .cgo(
                Path::new("/src/png"),
                Path::new("/obj"),
                &["-DX".to_string()],
                &["png.go".to_string(), "io.go".to_string()],
            )
            .unwrap();

        assert_eq!(
            exec.calls(),
            vec!["(cd /src/png; /goroot/bin/go tool cgo -objdir /obj -- -I /obj -DX png.go io.go)"]
        );
        assert_eq!(
            outputs.go_files,
            vec![
                PathBuf::from("/obj/_cgo_gotypes.go"),
                PathBuf::from("/obj/png.cgo1.go"),
                PathBuf::from("/obj/io.cgo1.go"),
            ]
        );
        assert_eq!(
            outputs.c_files,
            vec![
                PathBuf::from("/obj/_cgo_export.c"),
                PathBuf::from("/obj/png.cgo2.c"),
                PathBuf::from("/obj/io.cgo2.c"),
            ]
        );
    }

    #[test]
    fn test_symabis_writes_placeholder_header() {
        let tmp = TempDir::new().unwrap();
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let tc = toolchain(&exec).with_version(Version::new(1, 22, 0));

        let headers = tc
            .symabis("example.com/x", tmp.path(), &[PathBuf::from("/src/x_amd64.s")])
            .unwrap();

        assert!(headers.asm_header.exists());
        assert_eq!(headers.symabis, tmp.path().join("symabis"));
        let call = &exec.calls()[0];
        assert!(call.starts_with("/goroot/bin/go tool asm -p example.com/x -I "));
        assert!(call.contains("-I /goroot/pkg/include -D GOOS_linux -D GOARCH_amd64 -gensymabis -o "));
        assert!(call.ends_with(" /src/x_amd64.s"));
    }

    #[test]
    fn test_asm_omits_import_path_before_go119() {
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let tc = toolchain(&exec).with_version(Version::new(1, 18, 0));

        let objects = tc
            .asm("example.com/x", Path::new("/obj"), Some("/src"), &[PathBuf::from("/src/x_amd64.s")])
            .unwrap();

        assert_eq!(objects, vec![PathBuf::from("/obj/x_amd64.o")]);
        assert_eq!(
            exec.calls(),
            vec![
                "/goroot/bin/go tool asm -I /obj -I /goroot/pkg/include -D GOOS_linux -D GOARCH_amd64 \
                 -trimpath /src -o /obj/x_amd64.o /src/x_amd64.s"
            ]
        );
    }

    #[test]
    fn test_compile_uses_args_file() {
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let tc = toolchain(&exec);

        let req = CompileRequest {
            import_path: "example.com/x".to_string(),
            importcfg: PathBuf::from("/obj/importcfg"),
            out: PathBuf::from("/obj/x.a"),
            trimpath: Some("/src".to_string()),
            embedcfg: None,
            asm: None,
            files: vec![PathBuf::from("/src/a.go"), PathBuf::from("/src/b.go")],
        };
        tc.compile(&req).unwrap();

        let calls = exec.recorded();
        assert_eq!(calls.len(), 1);
        let args = &calls[0].spec.args;
        assert_eq!(
            &args[..args.len() - 1],
            &[
                "tool", "compile", "-pack", "-p", "example.com/x", "-trimpath", "/src",
                "-importcfg", "/obj/importcfg", "-o", "/obj/x.a",
            ]
        );
        let token = args.last().unwrap();
        assert!(token.starts_with('@'));
        assert_eq!(calls[0].args_files, vec!["/src/a.go\n/src/b.go"]);
        assert!(!Path::new(&token[1..]).exists());
    }

    #[test]
    fn test_compile_failure_removes_args_file() {
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::failure(2, "a.go:3: undefined: y"));
        let tc = toolchain(&exec);

        let req = CompileRequest {
            importcfg: PathBuf::from("/obj/importcfg"),
            out: PathBuf::from("/obj/x.a"),
            files: vec![PathBuf::from("/src/a.go")],
            ..CompileRequest::default()
        };
        let err = tc.compile(&req).unwrap_err();

        assert_eq!(err.stage(), Some(Stage::Compile));
        assert!(err.to_string().contains("undefined: y"));
        let token = exec.recorded()[0].spec.args.last().unwrap().clone();
        assert!(!Path::new(&token[1..]).exists());
        assert!(!exec.recorded()[0].spec.args.contains(&"-p".to_string()));
    }

    #[test]
    fn test_c_compile_stops_at_first_failure() {
        let exec = Arc::new(MockExecutor::new());
        exec.expect_contains("b.c", MockProcessOutput::failure(1, "b.c:1: error: boom"));
        exec.set_default(MockProcessOutput::success(""));
        let tc = toolchain(&exec);

        let files = ["a.c", "b.c", "c.c"].map(PathBuf::from);
        let err = tc
            .c_compile(Path::new("/src"), Path::new("/obj"), &files, &["-O2".to_string()])
            .unwrap_err();

        assert_eq!(
            exec.calls(),
            vec![
                "(cd /src; cc -Wno-error -Wno-unused-parameter -c -O2 -I . -o /obj/a.o a.c)",
                "(cd /src; cc -Wno-error -Wno-unused-parameter -c -O2 -I . -o /obj/b.o b.c)",
            ]
        );
        match err {
            ToolchainError::ToolFailed { stage, command, output } => {
                assert_eq!(stage, Stage::CCompile);
                assert!(command.contains("b.c"));
                assert_eq!(output, "b.c:1: error: boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pack_and_link() {
        let exec = Arc::new(MockExecutor::new());
        exec.set_default(MockProcessOutput::success(""));
        let tc = toolchain(&exec);

        tc.pack(Path::new("/obj/x.a"), &[PathBuf::from("/obj/a.o"), PathBuf::from("/obj/b.o")])
            .unwrap();
        tc.link(
            Path::new("/obj/x.a"),
            Path::new("/obj/importcfg.link"),
            Path::new("/out/x"),
            &["-lpng".to_string(), "-lz".to_string()],
        )
        .unwrap();

        let calls = exec.recorded();
        assert_eq!(calls[0].command, "/goroot/bin/go tool pack r /obj/x.a /obj/a.o /obj/b.o");
        assert_eq!(
            calls[1].spec.args,
            vec![
                "tool", "link", "-extld", "cc", "-extldflags", "-lpng -lz", "-importcfg",
                "/obj/importcfg.link", "-o", "/out/x", "/obj/x.a",
            ]
        );
    }

    #[test]
    fn test_spawn_failure() {
        let exec = Arc::new(MockExecutor::new());
        let err = toolchain(&exec).pack(Path::new("/obj/x.a"), &[]).unwrap_err();
        assert!(matches!(err, ToolchainError::Spawn { stage: Stage::Pack, .. }));
    }
}
