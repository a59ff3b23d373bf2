//! Go backend for mob.
//!
//! Emits a `package main` file for `go build`. The `fmt` import is only
//! written when a `print` call needs it; Go rejects unused imports.

use crate::ast::Node;
use crate::builtins::{BuiltinKind, find_builtin, unknown_call_marker};

const INDENT: &str = "    ";

/// Generate Go source for the given program.
pub fn generate_go(program: &Node) -> String {
    let statements = program.statements();
    let mut out = String::new();
    out.push_str("// Generated by mob. Do not edit.\n\n");
    out.push_str("package main\n\n");
    if statements.iter().any(|stmt| stmt.is_call("print")) {
        out.push_str("import (\n");
        out.push_str(INDENT);
        out.push_str("\"fmt\"\n");
        out.push_str(")\n\n");
    }
    out.push_str("func main() {\n");

    for statement in statements {
        if let Node::Call { name, args } = statement {
            out.push_str(INDENT);
            out.push_str(&generate_call(name, args));
            out.push('\n');
        }
    }

    out.push_str("}\n");
    out
}

fn generate_call(name: &str, args: &[Node]) -> String {
    match find_builtin(name).map(|builtin| builtin.kind) {
        Some(BuiltinKind::Print) => {
            let values: Vec<String> = args.iter().filter_map(generate_expression).collect();
            format!("fmt.Println({})", values.join(", "))
        }
        None => unknown_call_marker(name),
    }
}

fn generate_expression(node: &Node) -> Option<String> {
    match node {
        Node::StringLiteral { value } => Some(quote(value)),
        Node::Identifier { name } => Some(name.clone()),
        _ => None,
    }
}

/// Render `value` as a Go interpreted string literal.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
