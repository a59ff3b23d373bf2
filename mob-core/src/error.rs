use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read source file {path}: {source}")]
    SourceIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse error at line {line}: expected {expected}")]
    ParseError { expected: String, line: usize },
    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),
    #[error("build file I/O failed: {0}")]
    ScratchIo(#[from] std::io::Error),
    #[error("toolchain `{program}` could not be started: {source}")]
    ToolchainUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("compilation failed: `{program}` exited with {}", exit_code(.code))]
    ToolchainFailed { program: String, code: Option<i32> },
    #[error("failed to start compiled program: {0}")]
    ProgramSpawn(#[source] std::io::Error),
    #[error("program exited with {}", exit_code(.code))]
    ProgramFailed { code: Option<i32> },
}

fn exit_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
