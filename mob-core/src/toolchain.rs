//! External native toolchains.
//!
//! A toolchain turns one generated source file into one binary:
//! `(source, output) -> exit code`. Diagnostics go straight to the
//! caller's stderr.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::compiler::Target;
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    target: Target,
    program: OsString,
}

impl Toolchain {
    /// Toolchain for `target`, optionally overriding the program to run.
    ///
    /// Without an override, Rust uses `$RUSTC` when set and `rustc`
    /// otherwise; Go uses `go`.
    pub fn for_target(target: Target, program: Option<&Path>) -> Self {
        let program = match (program, target) {
            (Some(path), _) => path.as_os_str().to_os_string(),
            (None, Target::Rust) => std::env::var_os("RUSTC").unwrap_or_else(|| "rustc".into()),
            (None, Target::Go) => "go".into(),
        };
        Toolchain { target, program }
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn program(&self) -> &Path {
        Path::new(&self.program)
    }

    /// Whether the toolchain program can be started at all.
    pub fn is_available(&self) -> bool {
        let probe = match self.target {
            Target::Rust => "--version",
            Target::Go => "version",
        };
        Command::new(&self.program)
            .arg(probe)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .is_ok_and(|status| status.success())
    }

    /// Build `source` into an executable at `output`.
    ///
    /// Blocks until the toolchain exits. There is no timeout.
    pub fn build(&self, source: &Path, output: &Path) -> Result<(), CoreError> {
        let mut command = self.command(source, output);
        debug!("running {command:?}");

        let status = command
            .status()
            .map_err(|source| CoreError::ToolchainUnavailable {
                program: self.program_name(),
                source,
            })?;

        if !status.success() {
            return Err(CoreError::ToolchainFailed {
                program: self.program_name(),
                code: status.code(),
            });
        }
        Ok(())
    }

    fn command(&self, source: &Path, output: &Path) -> Command {
        let mut command = Command::new(&self.program);
        match self.target {
            Target::Rust => {
                command
                    .arg("--edition")
                    .arg("2021")
                    .arg("--crate-name")
                    .arg(crate_name(output))
                    .arg("-o")
                    .arg(output)
                    .arg(source);
            }
            Target::Go => {
                command.arg("build").arg("-o").arg(output).arg(source);
            }
        }
        command
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }
}

/// Crate name for rustc derived from the output file name.
///
/// rustc only accepts alphanumerics and underscores here.
fn crate_name(output: &Path) -> String {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name: String = stem
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() { ch } else { '_' })
        .collect();
    match name.chars().next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => name,
        _ => format!("mob_{name}"),
    }
}
