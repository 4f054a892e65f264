//! BUILD file and `.plzconfig` rendering.
//!
//! Output follows buildifier's layout: one attribute per line, lists with a
//! single element inline and longer lists one element per line.

use std::fmt::Write;

use crate::core::Rule;

/// The build definitions every generated BUILD file includes.
pub const GO_BUILD_DEFS: &str = "///go//build_defs:go";

enum Value<'a> {
    Str(&'a str),
    List(&'a [String]),
    Glob(&'a [String]),
}

/// Render a BUILD file holding the given rules.
pub fn render_build_file(rules: &[Rule]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "subinclude({})", quote(GO_BUILD_DEFS));

    for rule in rules {
        out.push('\n');
        render_rule(&mut out, rule);
    }
    out
}

fn render_rule(out: &mut String, rule: &Rule) {
    let mut attrs: Vec<(&str, Value<'_>)> = vec![("name", Value::Str(&rule.name))];

    if rule.kind.is_cgo() {
        attrs.push(("srcs", Value::List(&rule.cgo_srcs)));
        if !rule.srcs.is_empty() {
            attrs.push(("go_srcs", Value::List(&rule.srcs)));
        }
        if !rule.c_srcs.is_empty() {
            attrs.push(("c_srcs", Value::List(&rule.c_srcs)));
        }
    } else {
        attrs.push(("srcs", Value::List(&rule.srcs)));
    }

    let lists: [(&str, &[String]); 6] = [
        ("deps", &rule.deps),
        ("pkg_config", &rule.pkg_configs),
        ("compiler_flags", &rule.compiler_flags),
        ("linker_flags", &rule.linker_flags),
        ("hdrs", &rule.hdrs),
        ("asm_srcs", &rule.asm_srcs),
    ];
    for (name, values) in lists {
        if !values.is_empty() {
            attrs.push((name, Value::List(values)));
        }
    }
    if !rule.embed_patterns.is_empty() {
        attrs.push(("resources", Value::Glob(&rule.embed_patterns)));
    }

    let public = ["PUBLIC".to_string()];
    attrs.push(("visibility", Value::List(&public)));

    let _ = writeln!(out, "{}(", rule.kind);
    for (name, value) in attrs {
        let _ = match value {
            Value::Str(s) => writeln!(out, "    {} = {},", name, quote(s)),
            Value::List(items) => writeln!(out, "    {} = {},", name, list(items)),
            Value::Glob(items) => writeln!(out, "    {} = glob({}),", name, list(items)),
        };
    }
    out.push_str(")\n");
}

fn list(items: &[String]) -> String {
    match items {
        [] => "[]".to_string(),
        [one] => format!("[{}]", quote(one)),
        _ => {
            let mut s = String::from("[\n");
            for item in items {
                let _ = writeln!(s, "        {},", quote(item));
            }
            s.push_str("    ]");
            s
        }
    }
}

fn quote(s: &str) -> String {
    let mut q = String::with_capacity(s.len() + 2);
    q.push('"');
    for c in s.chars() {
        match c {
            '\\' => q.push_str("\\\\"),
            '"' => q.push_str("\\\""),
            '\n' => q.push_str("\\n"),
            '\t' => q.push_str("\\t"),
            _ => q.push(c),
        }
    }
    q.push('"');
    q
}

/// Render the `.plzconfig` declaring the Go plugin for the module.
pub fn render_plzconfig(plugin_target: &str, import_path: &str) -> String {
    format!("[Plugin \"go\"]\nTarget={plugin_target}\nImportPath={import_path}\n")
}
