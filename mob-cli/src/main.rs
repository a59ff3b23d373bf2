use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use log::info;
use mob_core::{Compiler, CompilerOptions, CoreError, Target};

/// Command line interface of the mob compiler.
#[derive(Parser, Debug)]
#[command(
    name = "mob",
    version,
    about,
    long_about = None,
    arg_required_else_help = true,
    disable_version_flag = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    // Handled by clap; `-v` prints the version like `mob version`.
    #[allow(dead_code)]
    #[arg(short = 'v', long, action = ArgAction::Version, help = "Print version")]
    version: Option<bool>,

    #[arg(
        long,
        global = true,
        value_name = "TARGET",
        default_value = "rust",
        help = "Host language to generate: rust, go"
    )]
    target: Target,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Toolchain program to use instead of the target's default"
    )]
    toolchain: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "DIR",
        help = "Directory for temporary build files (defaults to the system temp dir)"
    )]
    scratch_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Show detailed compilation information")]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile and execute a .mob file; the binary is removed afterwards
    Run { file: PathBuf },
    /// Compile a .mob file to a native binary
    Build {
        file: PathBuf,
        #[arg(short, long, default_value = "main", help = "Output binary name")]
        output: PathBuf,
    },
    /// Print the generated host source for a .mob file
    Emit { file: PathBuf },
    /// Show version information
    Version,
    /// Show version, target toolchain and platform information
    Info,
    /// `mob <file.mob>` is a shortcut for `mob run <file.mob>`
    #[command(external_subcommand)]
    External(Vec<OsString>),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            match err.downcast_ref::<CoreError>() {
                Some(CoreError::ProgramFailed { code: Some(code) }) => {
                    ExitCode::from(u8::try_from(*code).unwrap_or(1))
                }
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn execute(cli: Cli) -> Result<()> {
    let compiler = Compiler::new(CompilerOptions {
        target: cli.target,
        toolchain: cli.toolchain,
        scratch_dir: cli.scratch_dir,
    });

    match cli.command {
        Command::Run { file } => run(&compiler, &file),
        Command::Build { file, output } => {
            info!("building {} for {}", file.display(), cli.target);
            compiler
                .compile(&file, &output)
                .with_context(|| format!("failed to build {}", file.display()))?;
            println!("Build successful! Output: {}", output.display());
            Ok(())
        }
        Command::Emit { file } => {
            let code = compiler
                .emit(&file)
                .with_context(|| format!("failed to compile {}", file.display()))?;
            print!("{code}");
            Ok(())
        }
        Command::Version => {
            println!("mob {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Info => {
            print_info(&compiler);
            Ok(())
        }
        Command::External(args) => {
            let Some(first) = args.first() else {
                bail!("missing command");
            };
            let file = PathBuf::from(first);
            if file.extension().is_none_or(|ext| ext != "mob") {
                bail!("unknown command: {}", first.to_string_lossy());
            }
            run(&compiler, &file)
        }
    }
}

fn print_info(compiler: &Compiler) {
    let toolchain = compiler.toolchain();
    let status = if toolchain.is_available() {
        "available"
    } else {
        "not found"
    };
    println!("mob {}", env!("CARGO_PKG_VERSION"));
    println!("target:    {}", toolchain.target());
    println!("toolchain: {} ({status})", toolchain.program().display());
    println!(
        "platform:  {}/{}",
        std::env::consts::OS,
        std::env::consts::ARCH
    );
}

fn run(compiler: &Compiler, file: &Path) -> Result<()> {
    info!("running {}", file.display());
    compiler
        .compile_and_run(file)
        .with_context(|| format!("failed to run {}", file.display()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use assert_cmd::Command;
    use mob_core::toolchain::Toolchain;
    use predicates::prelude::*;
    use tempfile::tempdir;

    fn rustc_available() -> bool {
        let available = Toolchain::for_target(Target::Rust, None).is_available();
        if !available {
            eprintln!("skipping: rustc is not installed");
        }
        available
    }

    #[test]
    fn runs_hello_world() {
        if !rustc_available() {
            return;
        }
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("hello.mob");
        fs::write(&input_path, r#"print("Hello World!")"#).expect("write input");
        let scratch = dir.path().join("scratch");
        fs::create_dir(&scratch).expect("create scratch");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("run")
            .arg(&input_path)
            .arg("--scratch-dir")
            .arg(&scratch)
            .assert()
            .success()
            .stdout("Hello World!\n");

        let leftovers = fs::read_dir(&scratch).expect("read scratch").count();
        assert_eq!(leftovers, 0, "temporary files were left behind");
    }

    #[test]
    fn file_argument_is_a_shortcut_for_run() {
        if !rustc_available() {
            return;
        }
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("hello.mob");
        fs::write(&input_path, "print(\"one\")\nprint(\"two\")\n").expect("write input");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg(&input_path)
            .assert()
            .success()
            .stdout("one\ntwo\n");
    }

    #[test]
    fn builds_binary() {
        if !rustc_available() {
            return;
        }
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("hello.mob");
        fs::write(&input_path, r#"print("built")"#).expect("write input");
        let output_path = dir.path().join("hello");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("build")
            .arg(&input_path)
            .arg("-o")
            .arg(&output_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("Build successful!"));

        assert!(output_path.exists(), "binary was not created");
        let out = std::process::Command::new(&output_path)
            .output()
            .expect("run built binary");
        assert_eq!(String::from_utf8_lossy(&out.stdout), "built\n");
    }

    #[test]
    fn emits_rust_source() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("hello.mob");
        fs::write(&input_path, "print(\"hi\")\nfoo(\"x\")\n").expect("write input");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("emit")
            .arg(&input_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("fn main() {"))
            .stdout(predicate::str::contains(r#"println!("{}", "hi");"#))
            .stdout(predicate::str::contains("// unknown function: foo"));
    }

    #[test]
    fn emits_go_source() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("hello.mob");
        fs::write(&input_path, r#"print("hi")"#).expect("write input");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("emit")
            .arg(&input_path)
            .arg("--target")
            .arg("go")
            .assert()
            .success()
            .stdout(predicate::str::contains("package main"))
            .stdout(predicate::str::contains(r#"fmt.Println("hi")"#));
    }

    #[test]
    fn rejects_unknown_target() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("hello.mob");
        fs::write(&input_path, r#"print("hi")"#).expect("write input");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("emit")
            .arg(&input_path)
            .arg("--target")
            .arg("wasm")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unsupported target: wasm"));
    }

    #[test]
    fn reports_missing_closing_paren() {
        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("broken.mob");
        fs::write(&input_path, "print(\"ok\")\nprint(\"x\"").expect("write input");
        let output_path = dir.path().join("broken");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("build")
            .arg(&input_path)
            .arg("--output")
            .arg(&output_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "parse error at line 2: expected ')' after arguments",
            ));

        assert!(!output_path.exists(), "no binary should be produced");
    }

    #[test]
    fn reports_missing_source_file() {
        let dir = tempdir().expect("tempdir");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("run")
            .arg(dir.path().join("missing.mob"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("failed to read source file"));
    }

    #[test]
    fn prints_version() {
        let expected = format!("mob {}\n", env!("CARGO_PKG_VERSION"));
        for args in [&["version"][..], &["-v"][..], &["--version"][..]] {
            Command::cargo_bin("mob")
                .expect("binary exists")
                .args(args)
                .assert()
                .success()
                .stdout(expected.clone());
        }
    }

    #[test]
    fn prints_info() {
        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("info")
            .arg("--target")
            .arg("go")
            .arg("--toolchain")
            .arg("/definitely/not/a/real/go")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
            .stdout(predicate::str::contains("target:    go"))
            .stdout(predicate::str::contains(
                "toolchain: /definitely/not/a/real/go (not found)",
            ))
            .stdout(predicate::str::contains(std::env::consts::OS));
    }

    #[cfg(unix)]
    #[test]
    fn exits_with_the_program_exit_code() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let input_path = dir.path().join("exit.mob");
        fs::write(&input_path, r#"print("x")"#).expect("write input");
        let scratch = dir.path().join("scratch");
        fs::create_dir(&scratch).expect("create scratch");

        // Stands in for rustc: writes a program exiting with 3 to the `-o` path.
        let toolchain = dir.path().join("fake-rustc");
        fs::write(
            &toolchain,
            "#!/bin/sh\n\
             while [ \"$#\" -gt 0 ]; do\n\
             if [ \"$1\" = \"-o\" ]; then out=\"$2\"; shift; fi\n\
             shift\n\
             done\n\
             printf '#!/bin/sh\\nexit 3\\n' > \"$out\"\n\
             chmod +x \"$out\"\n",
        )
        .expect("write toolchain");
        fs::set_permissions(&toolchain, fs::Permissions::from_mode(0o755))
            .expect("chmod toolchain");

        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("run")
            .arg(&input_path)
            .arg("--toolchain")
            .arg(&toolchain)
            .arg("--scratch-dir")
            .arg(&scratch)
            .assert()
            .code(3)
            .stderr(predicate::str::contains("program exited with status 3"));

        let leftovers = fs::read_dir(&scratch).expect("read scratch").count();
        assert_eq!(leftovers, 0, "temporary files were left behind");
    }

    #[test]
    fn reports_unknown_command() {
        Command::cargo_bin("mob")
            .expect("binary exists")
            .arg("serve")
            .assert()
            .failure()
            .stderr(predicate::str::contains("unknown command: serve"));
    }
}
