//! Core compiler pipeline for the mob language.
//!
//! The pipeline is:
//!
//!   source .mob
//!     -> lexer      (tokens, with indent/dedent from leading spaces)
//!     -> parser     (AST of call statements)
//!     -> codegen    (Rust or Go source text)
//!     -> toolchain  (rustc / go build, external process)
//!
//! Higher-level tools (the `mob` CLI) should depend on this crate rather
//! than reimplementing the pipeline.

// ---------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------

pub mod error;

// ---------------------------------------------------------------------
// Front-end: lexing and parsing
// ---------------------------------------------------------------------

pub mod lexer;
pub mod parser;
pub mod ast;

// ---------------------------------------------------------------------
// Builtins
// ---------------------------------------------------------------------

pub mod builtins;

// ---------------------------------------------------------------------
// Back-end: code generation, toolchains and compiler orchestration
// ---------------------------------------------------------------------

pub mod codegen_rust;
pub mod codegen_go;
pub mod toolchain;
pub mod compiler;

// ---------------------------------------------------------------------
// Public API re-exports
// ---------------------------------------------------------------------

pub use ast::Node;
pub use compiler::{
    Compiler, CompilerOptions, Target, compile, compile_and_run, emit_source, generate,
};
pub use error::CoreError;
pub use lexer::{Token, TokenKind, lex};
pub use parser::{parse, parse_source};
