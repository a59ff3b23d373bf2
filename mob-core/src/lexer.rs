//! Lexer for mob source files.
//!
//! The lexer is total: it never fails. Characters it does not understand
//! are skipped, and leading spaces after every newline are turned into
//! `Indent` / `Dedent` tokens against an indentation stack.

use std::fmt;

/// Kind of a token produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    // Special
    Eof,

    // Identifiers and literals
    Ident,
    StringLiteral,
    /// Reserved; the scanner has no numeric-literal path yet.
    Number,

    // Punctuation
    LParen, // (
    RParen, // )
    Colon,  // :

    // Layout
    Indent,
    Dedent,
    Newline,
}

impl TokenKind {
    fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Ident => "Identifier",
            TokenKind::StringLiteral => "String",
            TokenKind::Number => "Number",
            TokenKind::LParen => "LeftParen",
            TokenKind::RParen => "RightParen",
            TokenKind::Colon => "Colon",
            TokenKind::Indent => "Indent",
            TokenKind::Dedent => "Dedent",
            TokenKind::Newline => "Newline",
        }
    }
}

/// A single token with its kind, raw text and 1-based line.
///
/// Layout tokens and `Eof` carry empty text. String literals keep
/// both quotes; the parser strips them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
}

impl Token {
    fn layout(kind: TokenKind, line: usize) -> Self {
        Token {
            kind,
            text: String::new(),
            line,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token{{{}, {:?}, Line: {}}}",
            self.kind.name(),
            self.text,
            self.line
        )
    }
}

/// Lex a source string into tokens.
///
/// The result always ends with exactly one `Eof` token, preceded by
/// one `Dedent` for every indentation level still open.
pub fn lex(source: &str) -> Vec<Token> {
    let mut lexer = Lexer {
        source,
        index: 0,
        line: 1,
        indent_stack: vec![0],
        tokens: Vec::new(),
    };
    lexer.run();
    lexer.tokens
}

struct Lexer<'src> {
    source: &'src str,
    /// Byte offset of the next character.
    index: usize,
    line: usize,
    /// Active indentation levels. The base `0` is never popped.
    indent_stack: Vec<usize>,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    fn run(&mut self) {
        while let Some(ch) = self.peek_char() {
            match ch {
                '\n' => {
                    self.tokens.push(Token::layout(TokenKind::Newline, self.line));
                    self.consume_char();
                    self.line += 1;
                    self.handle_indent();
                }
                '(' => self.punct(TokenKind::LParen),
                ')' => self.punct(TokenKind::RParen),
                ':' => self.punct(TokenKind::Colon),
                '"' => self.lex_string(),
                _ if ch.is_alphabetic() => self.lex_ident(),
                // Whitespace and anything unrecognized.
                _ => self.consume_char(),
            }
        }

        while self.indent_stack.len() > 1 {
            self.indent_stack.pop();
            self.tokens.push(Token::layout(TokenKind::Dedent, self.line));
        }

        self.tokens.push(Token::layout(TokenKind::Eof, self.line));
    }

    fn punct(&mut self, kind: TokenKind) {
        let start = self.index;
        self.consume_char();
        self.push_text(kind, start);
    }

    fn push_text(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            text: self.source[start..self.index].to_string(),
            line: self.line,
        });
    }

    /// Measure the indentation of the line that starts at the cursor and
    /// emit `Indent` / `Dedent` tokens against the stack.
    ///
    /// Tabs are consumed but count zero. A dedent to a level that was
    /// never pushed is accepted as-is.
    fn handle_indent(&mut self) {
        let mut level = 0;
        while let Some(ch @ (' ' | '\t')) = self.peek_char() {
            if ch == ' ' {
                level += 1;
            }
            self.consume_char();
        }

        let current = self.current_indent();
        if level > current {
            self.indent_stack.push(level);
            self.tokens.push(Token::layout(TokenKind::Indent, self.line));
        } else if level < current {
            while self.indent_stack.len() > 1 && self.current_indent() > level {
                self.indent_stack.pop();
                self.tokens.push(Token::layout(TokenKind::Dedent, self.line));
            }
        }
    }

    fn current_indent(&self) -> usize {
        self.indent_stack.last().copied().unwrap_or(0)
    }

    fn lex_string(&mut self) {
        let start = self.index;
        // Opening quote
        self.consume_char();

        while let Some(ch) = self.peek_char() {
            match ch {
                '"' => break,
                '\\' => {
                    // Escapes are kept verbatim: backslash + next character.
                    self.consume_char();
                    self.consume_char();
                }
                _ => self.consume_char(),
            }
        }

        // Closing quote, if the string is terminated at all.
        self.consume_char();
        self.push_text(TokenKind::StringLiteral, start);
    }

    fn lex_ident(&mut self) {
        let start = self.index;
        while let Some(ch) = self.peek_char() {
            if is_ident_continue(ch) {
                self.consume_char();
            } else {
                break;
            }
        }
        self.push_text(TokenKind::Ident, start);
    }

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.index..)?.chars().next()
    }

    fn consume_char(&mut self) {
        if let Some(ch) = self.peek_char() {
            self.index += ch.len_utf8();
        }
    }
}

fn is_ident_continue(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}
