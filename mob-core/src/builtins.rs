//! Built-in functions of the mob language.
//!
//! This module only describes builtins. Backends are responsible for
//! mapping each `BuiltinKind` to the host language's facilities.

/// Kind of builtin, used by backends to decide how to lower a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinKind {
    /// Writes its arguments to standard output, separated by spaces and
    /// followed by a newline.
    Print,
}

/// Metadata about a single builtin symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinDescriptor {
    /// Name of the builtin at the mob level (e.g., `print`).
    pub name: &'static str,

    /// Kind tag used by backends.
    pub kind: BuiltinKind,
}

/// The complete list of builtins known to the core.
///
/// Calls to any other name are compiled to a comment marker.
pub const BUILTINS: &[BuiltinDescriptor] = &[BuiltinDescriptor {
    name: "print",
    kind: BuiltinKind::Print,
}];

/// Look up a builtin by its mob-level name.
pub fn find_builtin(name: &str) -> Option<&'static BuiltinDescriptor> {
    BUILTINS.iter().find(|builtin| builtin.name == name)
}

/// Marker line emitted for calls to names that are not builtins.
pub fn unknown_call_marker(name: &str) -> String {
    format!("// unknown function: {name}")
}
