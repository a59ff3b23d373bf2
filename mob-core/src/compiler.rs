use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::str::FromStr;

use log::{debug, info};
use tempfile::TempDir;

use crate::ast::Node;
use crate::codegen_go::generate_go;
use crate::codegen_rust::generate_rust;
use crate::error::CoreError;
use crate::lexer::lex;
use crate::parser::parse;
use crate::toolchain::Toolchain;

/// Name of the binary inside a build directory. Never equal to a
/// generated source file name.
const BINARY_NAME: &str = if cfg!(windows) { "program.exe" } else { "program" };

/// Host language the generated source is written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Target {
    #[default]
    Rust,
    Go,
}

impl Target {
    pub fn name(self) -> &'static str {
        match self {
            Target::Rust => "rust",
            Target::Go => "go",
        }
    }

    /// File name of the generated source inside the build directory.
    pub fn source_file_name(self) -> &'static str {
        match self {
            Target::Rust => "main.rs",
            Target::Go => "main.go",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Target {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rust" => Ok(Target::Rust),
            "go" => Ok(Target::Go),
            other => Err(CoreError::UnsupportedTarget(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilerOptions {
    pub target: Target,
    /// Toolchain program to run instead of the target's default.
    pub toolchain: Option<PathBuf>,
    /// Directory in which temporary build directories are created.
    /// Defaults to the system temp directory.
    pub scratch_dir: Option<PathBuf>,
}

/// Runs the mob pipeline: lex, parse, generate, then build (and run)
/// with the target's external toolchain.
///
/// A `Compiler` holds no state between calls; every compilation is
/// independent.
#[derive(Debug, Clone)]
pub struct Compiler {
    options: CompilerOptions,
    toolchain: Toolchain,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new(CompilerOptions::default())
    }
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        let toolchain = Toolchain::for_target(options.target, options.toolchain.as_deref());
        Compiler { options, toolchain }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Generated host source for the file at `source_path`.
    pub fn emit(&self, source_path: impl AsRef<Path>) -> Result<String, CoreError> {
        let source = read_source(source_path.as_ref())?;
        emit_source(&source, self.options.target)
    }

    /// Compile the file at `source_path` into an executable at `output`.
    ///
    /// The generated source and the intermediate binary live in a
    /// temporary directory that is removed on every exit path. `output`
    /// is only written once the toolchain has succeeded.
    pub fn compile(
        &self,
        source_path: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<(), CoreError> {
        let source_path = source_path.as_ref();
        let output = std::path::absolute(output.as_ref())?;

        let build_dir = self.scratch("mob_compile_")?;
        let binary = self.build_in(source_path, &build_dir)?;
        move_file(&binary, &output)?;
        info!("built {} -> {}", source_path.display(), output.display());
        Ok(())
    }

    /// Compile the file at `source_path` into a temporary executable and
    /// run it with the caller's standard streams.
    ///
    /// The temporary binary is removed whether compilation or execution
    /// succeeds or not. A non-zero exit of the program is reported as
    /// [`CoreError::ProgramFailed`].
    pub fn compile_and_run(&self, source_path: impl AsRef<Path>) -> Result<(), CoreError> {
        let source_path = source_path.as_ref();
        let run_dir = self.scratch("mob_run_")?;
        let binary = self.build_in(source_path, &run_dir)?;

        debug!("executing {}", binary.display());
        let status = Command::new(&binary)
            .status()
            .map_err(CoreError::ProgramSpawn)?;
        if !status.success() {
            return Err(CoreError::ProgramFailed {
                code: status.code(),
            });
        }
        Ok(())
    }

    /// Generate source into `dir` and build it there. Returns the path of
    /// the binary.
    fn build_in(&self, source_path: &Path, dir: &TempDir) -> Result<PathBuf, CoreError> {
        let code = self.emit(source_path)?;

        let generated = dir.path().join(self.options.target.source_file_name());
        fs::write(&generated, code)?;
        debug!("wrote generated source to {}", generated.display());

        let binary = dir.path().join(BINARY_NAME);
        self.toolchain.build(&generated, &binary)?;
        Ok(binary)
    }

    fn scratch(&self, prefix: &str) -> Result<TempDir, CoreError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(prefix);
        let dir = match &self.options.scratch_dir {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };
        debug!("created build directory {}", dir.path().display());
        Ok(dir)
    }
}

/// Compile `source_path` into `output` with default options.
pub fn compile(source_path: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<(), CoreError> {
    Compiler::default().compile(source_path, output)
}

/// Compile and run `source_path` with default options.
pub fn compile_and_run(source_path: impl AsRef<Path>) -> Result<(), CoreError> {
    Compiler::default().compile_and_run(source_path)
}

/// Lex, parse and generate host source for `source`.
pub fn emit_source(source: &str, target: Target) -> Result<String, CoreError> {
    let tokens = lex(source);
    debug!("lexed {} token(s)", tokens.len());
    let program = parse(tokens)?;
    Ok(generate(&program, target))
}

/// Generate host source for an already parsed program.
pub fn generate(program: &Node, target: Target) -> String {
    match target {
        Target::Rust => generate_rust(program),
        Target::Go => generate_go(program),
    }
}

fn read_source(path: &Path) -> Result<String, CoreError> {
    debug!("reading {}", path.display());
    fs::read_to_string(path).map_err(|source| CoreError::SourceIo {
        path: path.to_path_buf(),
        source,
    })
}

/// Move `from` to `to`, copying when they are on different filesystems.
fn move_file(from: &Path, to: &Path) -> Result<(), CoreError> {
    if fs::rename(from, to).is_err() {
        fs::copy(from, to)?;
    }
    Ok(())
}
