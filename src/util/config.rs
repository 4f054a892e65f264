//! Configuration file support for please_go.
//!
//! Two configuration file locations are read:
//! - Global: `~/.please_go/config.toml` - User-wide defaults
//! - Project: `<src-root>/.please_go/config.toml` - Project-specific overrides
//!
//! Project config takes precedence over global config, and the usual Go
//! environment variables (`GO`, `CC`, `PKG_CONFIG`, `GOOS`, `GOARCH`,
//! `CGO_ENABLED`) take precedence over both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// please_go configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External tool locations
    pub toolchain: ToolchainSettings,

    /// BUILD file generation settings
    pub generate: GenerateConfig,

    /// Target platform settings
    pub platform: PlatformConfig,
}

/// Paths to the external binaries driven by the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Path to the go tool (e.g., /usr/local/go/bin/go)
    pub go: Option<PathBuf>,

    /// Path to the C compiler used for cgo and as the external linker
    pub cc: Option<PathBuf>,

    /// Path to pkg-config
    pub pkg_config: Option<PathBuf>,
}

/// Settings for BUILD file generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Name of generated build files
    pub build_file_name: String,

    /// Plugin target written to `.plzconfig`
    pub plugin_target: String,

    /// Directory holding third-party module subrepos
    pub third_party_dir: String,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            build_file_name: "BUILD".to_string(),
            plugin_target: "@//plugins:go".to_string(),
            third_party_dir: "third_party/go".to_string(),
        }
    }
}

/// Target platform settings. Unset values fall back to the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    pub goos: Option<String>,
    pub goarch: Option<String>,
    pub cgo_enabled: Option<bool>,

    /// Highest `go1.N` release tag considered satisfied
    pub release_minor: Option<u32>,
}

impl Config {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(&mut self, other: Config) {
        // Toolchain settings
        if other.toolchain.go.is_some() {
            self.toolchain.go = other.toolchain.go;
        }
        if other.toolchain.cc.is_some() {
            self.toolchain.cc = other.toolchain.cc;
        }
        if other.toolchain.pkg_config.is_some() {
            self.toolchain.pkg_config = other.toolchain.pkg_config;
        }

        // Generate settings only override when they differ from the defaults
        let defaults = GenerateConfig::default();
        if other.generate.build_file_name != defaults.build_file_name {
            self.generate.build_file_name = other.generate.build_file_name;
        }
        if other.generate.plugin_target != defaults.plugin_target {
            self.generate.plugin_target = other.generate.plugin_target;
        }
        if other.generate.third_party_dir != defaults.third_party_dir {
            self.generate.third_party_dir = other.generate.third_party_dir;
        }

        // Platform settings
        if other.platform.goos.is_some() {
            self.platform.goos = other.platform.goos;
        }
        if other.platform.goarch.is_some() {
            self.platform.goarch = other.platform.goarch;
        }
        if other.platform.cgo_enabled.is_some() {
            self.platform.cgo_enabled = other.platform.cgo_enabled;
        }
        if other.platform.release_minor.is_some() {
            self.platform.release_minor = other.platform.release_minor;
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_vars(|key| std::env::var(key).ok().filter(|v| !v.is_empty()));
    }

    fn apply_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(go) = var("GO") {
            self.toolchain.go = Some(PathBuf::from(go));
        }
        if let Some(cc) = var("CC") {
            self.toolchain.cc = Some(PathBuf::from(cc));
        }
        if let Some(pkg_config) = var("PKG_CONFIG") {
            self.toolchain.pkg_config = Some(PathBuf::from(pkg_config));
        }
        if let Some(goos) = var("GOOS") {
            self.platform.goos = Some(goos);
        }
        if let Some(goarch) = var("GOARCH") {
            self.platform.goarch = Some(goarch);
        }
        if let Some(cgo) = var("CGO_ENABLED") {
            self.platform.cgo_enabled = Some(cgo.trim() == "1");
        }
    }
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (.please_go/config.toml)
/// 2. Global config (~/.please_go/config.toml)
/// 3. Defaults
pub fn load_config(global_path: &Path, project_path: &Path) -> Config {
    let mut config = Config::default();

    if global_path.exists() {
        let global = Config::load_or_default(global_path);
        config.merge(global);
    }

    if project_path.exists() {
        let project = Config::load_or_default(project_path);
        config.merge(project);
    }

    config
}

/// Load the configuration for a source root, including environment overrides.
pub fn load_for_root(src_root: &Path) -> Config {
    let global = global_config_path().unwrap_or_default();
    let mut config = load_config(&global, &project_config_path(src_root));
    config.apply_env();
    config
}

/// Get the global config directory (~/.please_go).
pub fn global_config_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".please_go"))
}

/// Get the global config path (~/.please_go/config.toml).
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("config.toml"))
}

/// Get the project config path (.please_go/config.toml).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".please_go").join("config.toml")
}
