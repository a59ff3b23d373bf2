//! Rust backend for mob.
//!
//! Translates a `Program` into a standalone Rust source file with a
//! single `fn main`, suitable for `rustc`. Generation never fails:
//! calls to unknown functions become comment lines.

use crate::ast::Node;
use crate::builtins::{BuiltinKind, find_builtin, unknown_call_marker};

const INDENT: &str = "    ";

/// Generate Rust source for the given program.
pub fn generate_rust(program: &Node) -> String {
    let mut out = String::new();
    out.push_str("// Generated by mob. Do not edit.\n\n");
    // println! lives in the prelude, so no imports are needed.
    out.push_str("fn main() {\n");

    for statement in program.statements() {
        if let Some(line) = generate_statement(statement) {
            out.push_str(INDENT);
            out.push_str(&line);
            out.push('\n');
        }
    }

    out.push_str("}\n");
    out
}

fn generate_statement(node: &Node) -> Option<String> {
    match node {
        Node::Call { name, args } => Some(generate_call(name, args)),
        _ => None,
    }
}

fn generate_call(name: &str, args: &[Node]) -> String {
    match find_builtin(name).map(|builtin| builtin.kind) {
        Some(BuiltinKind::Print) => {
            let values: Vec<String> = args.iter().filter_map(generate_expression).collect();
            if values.is_empty() {
                return "println!();".to_string();
            }
            let placeholders = vec!["{}"; values.len()].join(" ");
            format!("println!(\"{placeholders}\", {});", values.join(", "))
        }
        None => unknown_call_marker(name),
    }
}

fn generate_expression(node: &Node) -> Option<String> {
    match node {
        // Debug formatting of a str is a valid, fully escaped Rust literal.
        Node::StringLiteral { value } => Some(format!("{value:?}")),
        Node::Identifier { name } => Some(name.clone()),
        _ => None,
    }
}
