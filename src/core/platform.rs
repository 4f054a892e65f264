//! Target platform and build-constraint evaluation.
//!
//! Mirrors how the Go tool decides whether a file belongs in a build:
//! file-name `_GOOS`/`_GOARCH` suffixes, `//go:build` expressions and the
//! constraint lists on `#cgo` directives.

use thiserror::Error;

use crate::util::config::PlatformConfig;

const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

const KNOWN_ARCH: &[&str] = &[
    "386", "amd64", "amd64p32", "arm", "armbe", "arm64", "arm64be", "loong64", "mips", "mipsle",
    "mips64", "mips64le", "mips64p32", "mips64p32le", "ppc", "ppc64", "ppc64le", "riscv",
    "riscv64", "s390", "s390x", "sparc", "sparc64", "wasm",
];

/// Release tags are satisfied up to and including `go1.<DEFAULT_RELEASE_MINOR>`.
pub const DEFAULT_RELEASE_MINOR: u32 = 22;

/// A malformed `//go:build` expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid build constraint `{expr}`: {message}")]
pub struct ConstraintError {
    pub expr: String,
    pub message: String,
}

/// The platform packages are discovered for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    pub goos: String,
    pub goarch: String,
    pub cgo_enabled: bool,
    pub release_minor: u32,
}

impl Platform {
    pub fn new(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Platform {
            goos: goos.into(),
            goarch: goarch.into(),
            cgo_enabled: true,
            release_minor: DEFAULT_RELEASE_MINOR,
        }
    }

    /// The platform this binary runs on, in Go's naming.
    pub fn host() -> Self {
        Platform::new(host_goos(), host_goarch())
    }

    /// Host platform with configured overrides applied.
    pub fn from_config(config: &PlatformConfig) -> Self {
        let host = Platform::host();
        Platform {
            goos: config.goos.clone().unwrap_or(host.goos),
            goarch: config.goarch.clone().unwrap_or(host.goarch),
            cgo_enabled: config.cgo_enabled.unwrap_or(true),
            release_minor: config.release_minor.unwrap_or(DEFAULT_RELEASE_MINOR),
        }
    }

    pub fn with_cgo(mut self, enabled: bool) -> Self {
        self.cgo_enabled = enabled;
        self
    }

    /// Whether a single build tag is satisfied.
    pub fn matches_tag(&self, tag: &str) -> bool {
        if tag == self.goos || tag == self.goarch || tag == "gc" {
            return true;
        }
        match tag {
            "unix" => UNIX_OS.contains(&self.goos.as_str()),
            "cgo" => self.cgo_enabled,
            "linux" => self.goos == "android",
            "solaris" => self.goos == "illumos",
            "darwin" => self.goos == "ios",
            _ => tag
                .strip_prefix("go1.")
                .and_then(|minor| minor.parse::<u32>().ok())
                .is_some_and(|minor| minor >= 1 && minor <= self.release_minor),
        }
    }

    /// Whether a file name's `_GOOS`, `_GOARCH` or `_GOOS_GOARCH` suffix
    /// (before the first `.`, ignoring a trailing `_test`) matches.
    pub fn matches_file_name(&self, name: &str) -> bool {
        let stem = name.split('.').next().unwrap_or(name);
        let Some(first) = stem.find('_') else {
            return true;
        };

        let mut parts: Vec<&str> = stem[first..].split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }

        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_tag(parts[n - 1]) && self.matches_tag(parts[n - 2]);
        }
        if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
            return self.matches_tag(parts[n - 1]);
        }
        true
    }

    /// Evaluate a `//go:build` expression.
    pub fn eval_build_expr(&self, expr: &str) -> Result<bool, ConstraintError> {
        Ok(BuildExpr::parse(expr)?.eval(&|tag| self.matches_tag(tag)))
    }

    /// Evaluate the constraint list of a `#cgo` directive: space-separated
    /// alternatives of comma-separated, optionally negated terms. An empty
    /// list always matches.
    pub fn matches_cgo_constraints(&self, constraints: &[&str]) -> bool {
        if constraints.is_empty() {
            return true;
        }
        constraints.iter().any(|alternative| {
            alternative.split(',').all(|term| match term.strip_prefix('!') {
                Some(tag) => !self.matches_tag(tag),
                None => self.matches_tag(term),
            })
        })
    }
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "loongarch64" => "loong64",
        "wasm32" => "wasm",
        other => other,
    }
}

/// A parsed `//go:build` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildExpr {
    Tag(String),
    Not(Box<BuildExpr>),
    And(Box<BuildExpr>, Box<BuildExpr>),
    Or(Box<BuildExpr>, Box<BuildExpr>),
}

impl BuildExpr {
    pub fn parse(expr: &str) -> Result<Self, ConstraintError> {
        let tokens = lex_expr(expr).map_err(|message| ConstraintError {
            expr: expr.to_string(),
            message,
        })?;
        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
        };
        let parsed = parser.or().and_then(|e| {
            if parser.pos == tokens.len() {
                Ok(e)
            } else {
                Err(format!("unexpected `{}`", tokens[parser.pos]))
            }
        });
        parsed.map_err(|message| ConstraintError {
            expr: expr.to_string(),
            message,
        })
    }

    pub fn eval(&self, matches: &dyn Fn(&str) -> bool) -> bool {
        match self {
            BuildExpr::Tag(tag) => matches(tag),
            BuildExpr::Not(inner) => !inner.eval(matches),
            BuildExpr::And(a, b) => a.eval(matches) && b.eval(matches),
            BuildExpr::Or(a, b) => a.eval(matches) || b.eval(matches),
        }
    }
}

fn lex_expr(expr: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            ' ' | '\t' => {
                chars.next();
            }
            '(' | ')' | '!' => {
                chars.next();
                tokens.push(c.to_string());
            }
            '&' | '|' => {
                chars.next();
                if chars.next() != Some(c) {
                    return Err(format!("expected `{c}{c}`"));
                }
                tokens.push(format!("{c}{c}"));
            }
            c if c.is_alphanumeric() || c == '_' || c == '.' => {
                let mut tag = String::new();
                while let Some(&ch) = chars.peek() {
                    if !(ch.is_alphanumeric() || ch == '_' || ch == '.') {
                        break;
                    }
                    tag.push(ch);
                    chars.next();
                }
                tokens.push(tag);
            }
            other => return Err(format!("unexpected character `{other}`")),
        }
    }

    if tokens.is_empty() {
        return Err("empty expression".to_string());
    }
    Ok(tokens)
}

struct ExprParser<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn or(&mut self) -> Result<BuildExpr, String> {
        let mut lhs = self.and()?;
        while self.peek() == Some("||") {
            self.pos += 1;
            lhs = BuildExpr::Or(Box::new(lhs), Box::new(self.and()?));
        }
        Ok(lhs)
    }

    fn and(&mut self) -> Result<BuildExpr, String> {
        let mut lhs = self.not()?;
        while self.peek() == Some("&&") {
            self.pos += 1;
            lhs = BuildExpr::And(Box::new(lhs), Box::new(self.not()?));
        }
        Ok(lhs)
    }

    fn not(&mut self) -> Result<BuildExpr, String> {
        if self.peek() == Some("!") {
            self.pos += 1;
            return Ok(BuildExpr::Not(Box::new(self.not()?)));
        }
        self.atom()
    }

    fn atom(&mut self) -> Result<BuildExpr, String> {
        match self.peek() {
            Some("(") => {
                self.pos += 1;
                let inner = self.or()?;
                if self.peek() != Some(")") {
                    return Err("missing `)`".to_string());
                }
                self.pos += 1;
                Ok(inner)
            }
            Some(tok) if !matches!(tok, ")" | "&&" | "||") => {
                let tag = tok.to_string();
                self.pos += 1;
                Ok(BuildExpr::Tag(tag))
            }
            Some(tok) => Err(format!("unexpected `{tok}`")),
            None => Err("unexpected end of expression".to_string()),
        }
    }
}
