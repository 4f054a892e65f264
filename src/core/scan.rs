//! Go source header scanning.
//!
//! Reads just enough of a Go file to place it in a package: leading build
//! constraints, the package clause, the import declarations (with the cgo
//! preamble attached to `import "C"`) and `//go:embed` patterns. Nothing
//! past the imports is parsed.

use thiserror::Error;

/// A Go file that could not be scanned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ScanError {
    pub message: String,
}

impl ScanError {
    fn new(message: impl Into<String>) -> Self {
        ScanError {
            message: message.into(),
        }
    }
}

/// What the header of one Go file declares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceHeader {
    /// Package name from the package clause
    pub package: String,
    /// Imported paths in declaration order, `"C"` included
    pub imports: Vec<String>,
    /// Expression of the `//go:build` line, if any
    pub build_constraint: Option<String>,
    /// Comment text immediately preceding `import "C"`
    pub cgo_preamble: Option<String>,
    /// `//go:embed` patterns (only collected when `embed` is imported)
    pub embed_patterns: Vec<String>,
}

impl SourceHeader {
    pub fn imports_c(&self) -> bool {
        self.imports.iter().any(|i| i == "C")
    }
}

/// One `#cgo` directive from a cgo preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CgoDirective {
    pub constraints: Vec<String>,
    pub verb: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Str(String),
    Punct(char),
}

/// Comment text without its delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Comment {
    Line(String),
    Block(String),
}

impl Comment {
    fn text(&self) -> &str {
        match self {
            Comment::Line(text) | Comment::Block(text) => text,
        }
    }
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    /// Comment group adjacent to the next token
    group: Vec<String>,
    /// Every comment seen before the first token
    leading: Vec<Comment>,
    /// Every `//` comment seen so far
    line_comments: Vec<String>,
    seen_token: bool,
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer {
            src,
            pos: 0,
            group: Vec::new(),
            leading: Vec::new(),
            line_comments: Vec::new(),
            seen_token: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    /// Skip whitespace and comments, maintaining the adjacent comment group.
    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        let mut newlines = 0;
        loop {
            let rest = self.rest();
            let Some(c) = rest.chars().next() else {
                return Ok(());
            };
            if c == '\n' {
                newlines += 1;
                self.pos += 1;
            } else if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else if rest.starts_with("//") {
                let end = rest.find('\n').unwrap_or(rest.len());
                let text = rest[2..end].trim_end_matches('\r').to_string();
                self.line_comments.push(text.clone());
                self.push_comment(Comment::Line(text), newlines);
                newlines = 0;
                self.pos += end;
            } else if rest.starts_with("/*") {
                let end = rest[2..]
                    .find("*/")
                    .ok_or_else(|| ScanError::new("comment not terminated"))?;
                let text = rest[2..2 + end].to_string();
                self.push_comment(Comment::Block(text), newlines);
                newlines = 0;
                self.pos += end + 4;
            } else {
                if newlines > 1 {
                    self.group.clear();
                }
                return Ok(());
            }
        }
    }

    fn push_comment(&mut self, comment: Comment, newlines_before: usize) {
        if newlines_before > 1 {
            self.group.clear();
        }
        self.group.push(comment.text().to_string());
        if !self.seen_token {
            self.leading.push(comment);
        }
    }

    fn take_doc(&mut self) -> Option<String> {
        if self.group.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.group).join("\n"))
        }
    }

    fn peek(&mut self) -> Result<Option<Token>, ScanError> {
        self.skip_trivia()?;
        let save = self.pos;
        let token = self.lex_token()?;
        self.pos = save;
        Ok(token)
    }

    fn next(&mut self) -> Result<Option<Token>, ScanError> {
        self.skip_trivia()?;
        let token = self.lex_token()?;
        if token.is_some() {
            self.seen_token = true;
            self.group.clear();
        }
        Ok(token)
    }

    fn lex_token(&mut self) -> Result<Option<Token>, ScanError> {
        let rest = self.rest();
        let Some(c) = rest.chars().next() else {
            return Ok(None);
        };

        if c.is_alphabetic() || c == '_' {
            let len = rest
                .find(|ch: char| !(ch.is_alphanumeric() || ch == '_'))
                .unwrap_or(rest.len());
            self.pos += len;
            return Ok(Some(Token::Ident(rest[..len].to_string())));
        }

        if c == '`' {
            let end = rest[1..]
                .find('`')
                .ok_or_else(|| ScanError::new("raw string literal not terminated"))?;
            self.pos += end + 2;
            return Ok(Some(Token::Str(rest[1..1 + end].to_string())));
        }

        if c == '\'' {
            let mut chars = rest[1..].char_indices();
            while let Some((i, ch)) = chars.next() {
                match ch {
                    '\'' => {
                        self.pos += i + 2;
                        return Ok(Some(Token::Punct('\'')));
                    }
                    '\\' => {
                        chars.next();
                    }
                    '\n' => break,
                    _ => {}
                }
            }
            return Err(ScanError::new("rune literal not terminated"));
        }

        if c == '"' {
            let mut value = String::new();
            let mut chars = rest[1..].char_indices();
            while let Some((i, ch)) = chars.next() {
                match ch {
                    '"' => {
                        self.pos += i + 2;
                        return Ok(Some(Token::Str(value)));
                    }
                    '\\' => {
                        if let Some((_, escaped)) = chars.next() {
                            value.push(escaped);
                        }
                    }
                    '\n' => break,
                    _ => value.push(ch),
                }
            }
            return Err(ScanError::new("string literal not terminated"));
        }

        self.pos += c.len_utf8();
        Ok(Some(Token::Punct(c)))
    }
}

/// Scan the header of a Go source file.
pub fn scan_go_source(src: &str) -> Result<SourceHeader, ScanError> {
    let mut lexer = Lexer::new(src);
    let mut header = SourceHeader::default();

    match lexer.next()? {
        Some(Token::Ident(kw)) if kw == "package" => {}
        _ => return Err(ScanError::new("expected 'package' clause")),
    }
    header.build_constraint = build_constraint_in(&lexer.leading);

    match lexer.next()? {
        Some(Token::Ident(name)) => header.package = name,
        _ => return Err(ScanError::new("expected package name")),
    }
    skip_semicolon(&mut lexer)?;

    loop {
        match lexer.peek()? {
            Some(Token::Ident(kw)) if kw == "import" => {}
            _ => break,
        }
        let decl_doc = lexer.take_doc();
        lexer.next()?;

        if lexer.peek()? == Some(Token::Punct('(')) {
            lexer.next()?;
            loop {
                if lexer.peek()? == Some(Token::Punct(')')) {
                    lexer.next()?;
                    break;
                }
                let spec_doc = lexer.take_doc();
                let path = import_spec(&mut lexer)?;
                if path == "C" {
                    header.cgo_preamble = spec_doc.or_else(|| decl_doc.clone());
                }
                header.imports.push(path);
                skip_semicolon(&mut lexer)?;
            }
        } else {
            let path = import_spec(&mut lexer)?;
            if path == "C" {
                header.cgo_preamble = decl_doc;
            }
            header.imports.push(path);
        }
        skip_semicolon(&mut lexer)?;
    }

    if header.imports.iter().any(|i| i == "embed") {
        while lexer.next()?.is_some() {}
        header.embed_patterns = embed_patterns(&lexer.line_comments)?;
    }

    Ok(header)
}

/// The `//go:build` expression among the leading comments of a non-Go
/// source file (assembly, C, headers).
pub fn scan_leading_constraint(src: &str) -> Result<Option<String>, ScanError> {
    let mut lexer = Lexer::new(src);
    lexer.skip_trivia()?;
    Ok(build_constraint_in(&lexer.leading))
}

/// Only a line comment starting exactly `//go:build ` is a constraint.
fn build_constraint_in(comments: &[Comment]) -> Option<String> {
    comments
        .iter()
        .filter_map(|c| match c {
            Comment::Line(text) => text.strip_prefix("go:build"),
            Comment::Block(_) => None,
        })
        .find(|rest| rest.starts_with([' ', '\t']))
        .map(|expr| expr.trim().to_string())
}

fn skip_semicolon(lexer: &mut Lexer<'_>) -> Result<(), ScanError> {
    if lexer.peek()? == Some(Token::Punct(';')) {
        lexer.next()?;
    }
    Ok(())
}

fn import_spec(lexer: &mut Lexer<'_>) -> Result<String, ScanError> {
    match lexer.next()? {
        Some(Token::Str(path)) => return Ok(path),
        Some(Token::Ident(_)) | Some(Token::Punct('.')) => {}
        _ => return Err(ScanError::new("expected import path")),
    }
    match lexer.next()? {
        Some(Token::Str(path)) => Ok(path),
        _ => Err(ScanError::new("expected import path after import name")),
    }
}

/// Patterns of the `//go:embed` directives among the file's line comments.
fn embed_patterns(line_comments: &[String]) -> Result<Vec<String>, ScanError> {
    let mut patterns = Vec::new();
    for comment in line_comments {
        let Some(rest) = comment.strip_prefix("go:embed") else {
            continue;
        };
        if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
            continue;
        }
        let fields = split_quoted(rest).map_err(ScanError::new)?;
        if fields.is_empty() {
            return Err(ScanError::new("go:embed requires at least one pattern"));
        }
        patterns.extend(fields);
    }
    Ok(patterns)
}

/// Parse the `#cgo` directives out of a cgo preamble.
pub fn parse_cgo_directives(preamble: &str) -> Result<Vec<CgoDirective>, ScanError> {
    let mut directives = Vec::new();

    for line in preamble.lines() {
        let line = line.trim();
        let Some(rest) = line.strip_prefix("#cgo") else {
            continue;
        };
        if !rest.starts_with([' ', '\t']) {
            continue;
        }

        let (head, args) = rest
            .split_once(':')
            .ok_or_else(|| ScanError::new(format!("{line}: invalid #cgo line")))?;
        let mut fields: Vec<String> = head.split_whitespace().map(str::to_string).collect();
        let verb = fields
            .pop()
            .ok_or_else(|| ScanError::new(format!("{line}: invalid #cgo line")))?;

        match verb.as_str() {
            "CFLAGS" | "CPPFLAGS" | "CXXFLAGS" | "FFLAGS" | "LDFLAGS" | "pkg-config" => {}
            _ => return Err(ScanError::new(format!("{line}: invalid #cgo verb: {verb}"))),
        }

        directives.push(CgoDirective {
            constraints: fields,
            verb,
            args: split_quoted(args).map_err(|e| ScanError::new(format!("{line}: {e}")))?,
        });
    }

    Ok(directives)
}

/// Split on whitespace, honouring single, double and back quotes.
fn split_quoted(s: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quote = None;
    let mut in_field = false;

    for c in s.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' || c == '`' => {
                quote = Some(c);
                in_field = true;
            }
            None if c.is_whitespace() => {
                if in_field {
                    fields.push(std::mem::take(&mut current));
                    in_field = false;
                }
            }
            None => {
                current.push(c);
                in_field = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unclosed quote".to_string());
    }
    if in_field {
        fields.push(current);
    }
    Ok(fields)
}
