//! `go.mod` manifest parsing.
//!
//! Only the directives that affect import resolution are kept: `module`,
//! `require` and `replace`. Everything else (`go`, `toolchain`, `exclude`,
//! `retract`, `godebug`) is accepted and ignored.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error reading or parsing a module manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read module manifest {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", .path.display())]
    Malformed {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("{}: no module directive", .path.display())]
    MissingModule { path: PathBuf },
}

/// The parts of a `go.mod` file that drive import resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleManifest {
    /// Module identity (import-path prefix)
    pub module: String,
    /// Required module paths, in declaration order
    pub requires: Vec<String>,
    /// Replace directives (old path -> new path)
    pub replace: HashMap<String, String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    Require,
    Replace,
    Other,
}

impl ModuleManifest {
    /// Read and parse a manifest from disk.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse manifest text. `path` is only used in error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self, ManifestError> {
        let malformed = |line: usize, message: String| ManifestError::Malformed {
            path: path.to_path_buf(),
            line,
            message,
        };

        let mut module = None;
        let mut requires = Vec::new();
        let mut replace = HashMap::new();
        let mut block = Block::None;

        for (idx, raw) in text.lines().enumerate() {
            let line_no = idx + 1;
            let tokens = tokenize(strip_comment(raw)).map_err(|m| malformed(line_no, m))?;
            if tokens.is_empty() {
                continue;
            }

            if block != Block::None {
                if tokens.len() == 1 && tokens[0] == ")" {
                    block = Block::None;
                    continue;
                }
                match block {
                    Block::Require => {
                        requires.push(parse_require(&tokens).map_err(|m| malformed(line_no, m))?)
                    }
                    Block::Replace => {
                        let (old, new) =
                            parse_replace(&tokens).map_err(|m| malformed(line_no, m))?;
                        replace.insert(old, new);
                    }
                    _ => {}
                }
                continue;
            }

            let verb = tokens[0].as_str();
            let args = &tokens[1..];
            let opens_block = args.len() == 1 && args[0] == "(";
            if matches!(args, [open, close] if open == "(" && close == ")") {
                continue;
            }

            match verb {
                "module" => {
                    let [path] = args else {
                        return Err(malformed(line_no, "usage: module module/path".to_string()));
                    };
                    module = Some(path.clone());
                }
                "require" if opens_block => block = Block::Require,
                "require" => {
                    requires.push(parse_require(args).map_err(|m| malformed(line_no, m))?)
                }
                "replace" if opens_block => block = Block::Replace,
                "replace" => {
                    let (old, new) = parse_replace(args).map_err(|m| malformed(line_no, m))?;
                    replace.insert(old, new);
                }
                _ if opens_block => block = Block::Other,
                _ => {}
            }
        }

        if block != Block::None {
            return Err(malformed(
                text.lines().count(),
                "unterminated block".to_string(),
            ));
        }

        let module = module.ok_or_else(|| ManifestError::MissingModule {
            path: path.to_path_buf(),
        })?;

        Ok(ModuleManifest {
            module,
            requires,
            replace,
        })
    }

    /// Required modules followed by the module itself, so that imports of
    /// the module's own packages resolve.
    pub fn required_modules(&self) -> Vec<String> {
        let mut modules = self.requires.clone();
        modules.push(self.module.clone());
        modules
    }
}

fn strip_comment(line: &str) -> &str {
    let mut in_quote = None;
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        match in_quote {
            Some(q) if b == q => in_quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'`' => in_quote = Some(b),
            None if b == b'/' && bytes.get(i + 1) == Some(&b'/') => return &line[..i],
            None => {}
        }
    }
    line
}

fn tokenize(line: &str) -> Result<Vec<String>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '"' || c == '`' {
            chars.next();
            let mut token = String::new();
            loop {
                match chars.next() {
                    Some(ch) if ch == c => break,
                    Some('\\') if c == '"' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    Some(ch) => token.push(ch),
                    None => return Err("unterminated quoted string".to_string()),
                }
            }
            tokens.push(token);
            continue;
        }
        if c == '(' || c == ')' {
            chars.next();
            tokens.push(c.to_string());
            continue;
        }
        let mut token = String::new();
        while let Some(&ch) = chars.peek() {
            if ch.is_whitespace() || ch == '(' || ch == ')' {
                break;
            }
            token.push(ch);
            chars.next();
        }
        tokens.push(token);
    }

    Ok(tokens)
}

fn parse_require(args: &[String]) -> Result<String, String> {
    match args {
        [path, _version] => Ok(path.clone()),
        _ => Err("usage: require module/path v1.2.3".to_string()),
    }
}

fn parse_replace(args: &[String]) -> Result<(String, String), String> {
    let usage = || "usage: replace module/path [v1.2.3] => other/module [v1.4.5]".to_string();

    let arrow = args.iter().position(|a| a == "=>").ok_or_else(usage)?;
    let (old, new) = (&args[..arrow], &args[arrow + 1..]);
    if old.is_empty() || old.len() > 2 || new.is_empty() || new.len() > 2 {
        return Err(usage());
    }
    Ok((old[0].clone(), new[0].clone()))
}
