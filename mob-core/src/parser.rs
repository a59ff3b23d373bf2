use log::debug;

use crate::ast::Node;
use crate::error::CoreError;
use crate::lexer::{Token, TokenKind, lex};

/// Lex and parse a source string.
pub fn parse_source(input: &str) -> Result<Node, CoreError> {
    parse(lex(input))
}

/// Parse a token sequence into a `Program`.
///
/// The sequence must end with `Eof`, as produced by [`lex`]. The first
/// structural error aborts the parse; no partial tree is returned.
pub fn parse(tokens: Vec<Token>) -> Result<Node, CoreError> {
    let mut parser = Parser {
        tokens,
        position: 0,
    };
    let statements = parser.parse_statements()?;
    debug!("parsed {} statement(s)", statements.len());
    Ok(Node::Program { statements })
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn parse_statements(&mut self) -> Result<Vec<Node>, CoreError> {
        let mut statements = Vec::new();
        while !self.is_at_end() {
            if let Some(statement) = self.parse_statement()? {
                statements.push(statement);
            }
            self.skip_newlines();
        }
        Ok(statements)
    }

    /// A statement is an identifier-led call. Anything else is dropped:
    /// layout tokens one at a time, other tokens together with the rest
    /// of their line.
    fn parse_statement(&mut self) -> Result<Option<Node>, CoreError> {
        if let Some(ident) = self.match_kind(TokenKind::Ident) {
            let name = ident.text.clone();
            return self.parse_call(name).map(Some);
        }

        match self.peek_kind() {
            TokenKind::Indent | TokenKind::Dedent => {
                self.advance();
            }
            _ => {
                let line = self.peek_line();
                debug!("dropping statement without a leading identifier at line {line}");
                while !self.is_at_end() && !self.check(TokenKind::Newline) {
                    self.advance();
                }
            }
        }
        Ok(None)
    }

    fn parse_call(&mut self, name: String) -> Result<Node, CoreError> {
        let mut args = Vec::new();
        if self.match_kind(TokenKind::LParen).is_some() {
            while !self.check(TokenKind::RParen) {
                match self.parse_expression() {
                    Some(arg) => args.push(arg),
                    None => break,
                }
            }
            self.consume(TokenKind::RParen, "')' after arguments")?;
        }
        Ok(Node::Call { name, args })
    }

    fn parse_expression(&mut self) -> Option<Node> {
        if let Some(token) = self.match_kind(TokenKind::StringLiteral) {
            return Some(Node::StringLiteral {
                value: strip_quotes(&token.text).to_string(),
            });
        }
        if let Some(token) = self.match_kind(TokenKind::Ident) {
            return Some(Node::Identifier {
                name: token.text.clone(),
            });
        }
        None
    }

    fn match_kind(&mut self, kind: TokenKind) -> Option<&Token> {
        if self.check(kind) {
            self.advance()
        } else {
            None
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek_kind() == kind
    }

    fn advance(&mut self) -> Option<&Token> {
        if self.is_at_end() {
            return None;
        }
        self.position += 1;
        self.tokens.get(self.position - 1)
    }

    fn consume(&mut self, kind: TokenKind, expected: &str) -> Result<&Token, CoreError> {
        if !self.check(kind) {
            return Err(CoreError::ParseError {
                expected: expected.to_string(),
                line: self.peek_line(),
            });
        }
        let line = self.peek_line();
        self.advance().ok_or_else(|| CoreError::ParseError {
            expected: expected.to_string(),
            line,
        })
    }

    fn skip_newlines(&mut self) {
        while self.match_kind(TokenKind::Newline).is_some() {}
    }

    fn is_at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// A missing token reads as `Eof`, so a sequence without its
    /// terminator still ends the parse.
    fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.position)
            .map_or(TokenKind::Eof, |token| token.kind)
    }

    fn peek_line(&self) -> usize {
        self.tokens
            .get(self.position)
            .or_else(|| self.tokens.last())
            .map_or(1, |token| token.line)
    }
}

/// Remove one surrounding quote from each end, if present.
fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}
