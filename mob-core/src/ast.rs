/// Syntax tree produced by the parser.
///
/// Each variant carries only the fields its shape needs. Children are
/// owned exclusively, so a whole tree is dropped as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Program { statements: Vec<Node> },
    Call { name: String, args: Vec<Node> },
    /// Quotes stripped, escape sequences kept verbatim.
    StringLiteral { value: String },
    Identifier { name: String },
}

impl Node {
    pub fn is_call(&self, name: &str) -> bool {
        matches!(self, Node::Call { name: n, .. } if n == name)
    }

    /// Top-level statements of a `Program`; empty for every other node.
    pub fn statements(&self) -> &[Node] {
        match self {
            Node::Program { statements } => statements,
            _ => &[],
        }
    }
}
