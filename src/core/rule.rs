//! Build rule definitions emitted into BUILD files.

use std::fmt;

/// Kind of rule generated for a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    GoLibrary,
    GoBinary,
    CgoLibrary,
    CgoBinary,
}

impl RuleKind {
    /// Select the rule kind from whether the package is a command and
    /// whether it uses cgo.
    pub fn select(is_command: bool, uses_cgo: bool) -> Self {
        match (is_command, uses_cgo) {
            (true, true) => RuleKind::CgoBinary,
            (true, false) => RuleKind::GoBinary,
            (false, true) => RuleKind::CgoLibrary,
            (false, false) => RuleKind::GoLibrary,
        }
    }

    /// The build definition function name.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::GoLibrary => "go_library",
            RuleKind::GoBinary => "go_binary",
            RuleKind::CgoLibrary => "cgo_library",
            RuleKind::CgoBinary => "cgo_binary",
        }
    }

    pub fn is_cgo(&self) -> bool {
        matches!(self, RuleKind::CgoLibrary | RuleKind::CgoBinary)
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, RuleKind::GoBinary | RuleKind::CgoBinary)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One rule to be written into a BUILD file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub name: String,
    pub kind: RuleKind,
    /// Pure Go sources
    pub srcs: Vec<String>,
    /// Go sources importing "C"
    pub cgo_srcs: Vec<String>,
    /// Plain C and C++ sources of a cgo package
    pub c_srcs: Vec<String>,
    pub compiler_flags: Vec<String>,
    pub linker_flags: Vec<String>,
    pub pkg_configs: Vec<String>,
    pub asm_srcs: Vec<String>,
    pub hdrs: Vec<String>,
    /// Resolved target references, in import order
    pub deps: Vec<String>,
    pub embed_patterns: Vec<String>,
}

impl Rule {
    pub fn new(name: impl Into<String>, kind: RuleKind) -> Self {
        Rule {
            name: name.into(),
            kind,
            srcs: Vec::new(),
            cgo_srcs: Vec::new(),
            c_srcs: Vec::new(),
            compiler_flags: Vec::new(),
            linker_flags: Vec::new(),
            pkg_configs: Vec::new(),
            asm_srcs: Vec::new(),
            hdrs: Vec::new(),
            deps: Vec::new(),
            embed_patterns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_selection() {
        assert_eq!(RuleKind::select(true, false), RuleKind::GoBinary);
        assert_eq!(RuleKind::select(false, false), RuleKind::GoLibrary);
        assert_eq!(RuleKind::select(true, true), RuleKind::CgoBinary);
        assert_eq!(RuleKind::select(false, true), RuleKind::CgoLibrary);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(RuleKind::CgoLibrary.to_string(), "cgo_library");
        assert!(RuleKind::CgoBinary.is_cgo());
        assert!(RuleKind::CgoBinary.is_binary());
        assert!(!RuleKind::GoLibrary.is_binary());
    }
}
