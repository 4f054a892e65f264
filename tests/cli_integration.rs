//! CLI integration tests for please_go.
//!
//! These tests run the binary against throwaway module trees and, for the
//! build commands, against stand-in go tools written as shell scripts.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the please_go binary command.
fn please_go() -> Command {
    let mut cmd = Command::cargo_bin("please_go").unwrap();
    for var in ["GO", "CC", "PKG_CONFIG", "GOOS", "GOARCH", "CGO_ENABLED"] {
        cmd.env_remove(var);
    }
    cmd
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn module(root: &Path) {
    write(
        root,
        "go.mod",
        "module example.com/app\n\ngo 1.21\n\nrequire (\n\tgithub.com/pkg/errors v0.9.1\n)\n",
    );
    write(
        root,
        "main.go",
        "package main\n\nimport (\n\t\"fmt\"\n\n\t\"example.com/app/store\"\n)\n\nfunc main() { fmt.Println(store.Name) }\n",
    );
    write(
        root,
        "store/store.go",
        "package store\n\nimport \"github.com/pkg/errors\"\n\nvar Name = errors.New(\"x\")\n",
    );
    write(root, "store/store_test.go", "package store\n\nimport \"testing\"\n");
    write(root, "store/testdata/broken.go", "not go at all");
    write(root, "winonly/reg_windows.go", "package winonly\n");
}

// ============================================================================
// please_go generate
// ============================================================================

#[test]
fn test_generate_writes_build_files() {
    let tmp = TempDir::new().unwrap();
    module(tmp.path());

    please_go()
        .args(["generate", "--src-root"])
        .arg(tmp.path())
        .env("GOOS", "linux")
        .env("GOARCH", "amd64")
        .assert()
        .success()
        .stdout(predicate::str::contains("BUILD"));

    let plzconfig = fs::read_to_string(tmp.path().join(".plzconfig")).unwrap();
    assert!(plzconfig.contains("[Plugin \"go\"]"));
    assert!(plzconfig.contains("ImportPath=example.com/app"));

    let root = fs::read_to_string(tmp.path().join("BUILD")).unwrap();
    assert!(root.contains("go_binary("));
    assert!(root.contains("name = \"app\""));
    assert!(root.contains("deps = [\"//store:store\"]"));

    let store = fs::read_to_string(tmp.path().join("store/BUILD")).unwrap();
    assert!(store.contains("go_library("));
    assert!(store.contains("srcs = [\"store.go\"]"));
    assert!(store.contains("\"///third_party/go/github.com_pkg_errors//:errors\""));
    assert!(!store.contains("store_test.go"));

    assert!(!tmp.path().join("store/testdata/BUILD").exists());
    assert!(!tmp.path().join("winonly/BUILD").exists());
}

#[test]
fn test_generate_respects_goos() {
    let tmp = TempDir::new().unwrap();
    module(tmp.path());

    please_go()
        .args(["generate", "--src-root"])
        .arg(tmp.path())
        .env("GOOS", "windows")
        .env("GOARCH", "amd64")
        .assert()
        .success();

    let build = fs::read_to_string(tmp.path().join("winonly/BUILD")).unwrap();
    assert!(build.contains("srcs = [\"reg_windows.go\"]"));
}

#[test]
fn test_generate_extra_requirement() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "go.mod", "module example.com/app\n");
    write(
        tmp.path(),
        "app.go",
        "package app\n\nimport \"golang.org/x/sys/unix\"\n",
    );

    please_go()
        .args(["generate", "--requirement", "golang.org/x/sys", "--src-root"])
        .arg(tmp.path())
        .assert()
        .success();

    let build = fs::read_to_string(tmp.path().join("BUILD")).unwrap();
    assert!(build.contains("deps = [\"///third_party/go/golang.org_x_sys//unix:unix\"]"));
}

#[test]
fn test_generate_without_go_mod_fails() {
    let tmp = TempDir::new().unwrap();

    please_go()
        .args(["generate", "--src-root"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("go.mod"));
}

#[test]
fn test_generate_conflicting_packages_fails() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "go.mod", "module example.com/app\n");
    write(tmp.path(), "mixed/a.go", "package a\n");
    write(tmp.path(), "mixed/b.go", "package b\n");

    please_go()
        .args(["generate", "--src-root"])
        .arg(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("mixed"));
}

// ============================================================================
// please_go build / go-version
// ============================================================================

#[cfg(unix)]
fn fake_go(dir: &Path, log: &Path) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("bin").join("go");
    write(
        dir,
        "bin/go",
        &format!(
            "#!/bin/sh\nif [ \"$1\" = version ]; then\n  echo 'go version go1.21.4 linux/amd64'\n  exit 0\nfi\necho \"$@\" >> '{}'\n",
            log.display()
        ),
    );
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn test_go_version_prints_minor() {
    let tmp = TempDir::new().unwrap();
    let go = fake_go(tmp.path(), &tmp.path().join("log"));

    please_go()
        .arg("go-version")
        .env("GO", &go)
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout("21\n");
}

#[cfg(unix)]
#[test]
fn test_build_runs_compile_and_link() {
    let tmp = TempDir::new().unwrap();
    let log = tmp.path().join("log");
    let go = fake_go(tmp.path(), &log);
    write(tmp.path(), "src/main.go", "package main\n");

    please_go()
        .args([
            "build",
            "--src-dir",
            "src",
            "--import-path",
            "main",
            "--object-dir",
            "obj",
            "--importcfg",
            "importcfg",
            "--go",
            "main.go",
            "--binary",
            "out/app",
        ])
        .env("GO", &go)
        .env("CC", "cc")
        .current_dir(tmp.path())
        .assert()
        .success();

    let log = fs::read_to_string(&log).unwrap();
    let lines: Vec<&str> = log.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("tool compile -pack -p main -importcfg "));
    assert!(lines[1].starts_with("tool link -extld "));
    assert!(lines[1].ends_with("obj/main.a"));
    assert!(tmp.path().join("obj").is_dir());
}

#[test]
fn test_build_requires_object_dir() {
    please_go()
        .args(["build", "--importcfg", "cfg", "--go", "a.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--object-dir"));
}

#[test]
fn test_help() {
    please_go()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("go-version"));
}
