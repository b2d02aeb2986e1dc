//! The script driver: picks the input and output streams, runs one
//! decoration pass and, when no output was requested, runs the result.

use crate::config::Pacing;
use crate::decorate::Decorator;
use crate::decorate::shebang::base_name;
use crate::runner::{ScriptRunner, exit_code};
use anyhow::{Context as _, Result};
use rand::Rng;
use std::fs::{File, Permissions};
use std::io::{self, BufWriter, Read, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

/// Where the script to decorate comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl Input {
    /// `-` means standard input, anything else is a path.
    pub fn from_arg(arg: &str) -> Self {
        match arg {
            "-" => Input::Stdin,
            path => Input::File(PathBuf::from(path)),
        }
    }

    /// Read the whole script. Bytes that are not UTF-8 are replaced rather
    /// than rejected.
    fn read_to_string(&self) -> Result<String> {
        let mut bytes = Vec::new();
        match self {
            Input::Stdin => {
                io::stdin()
                    .lock()
                    .read_to_end(&mut bytes)
                    .context("Failed to read script from stdin")?;
            }
            Input::File(path) => {
                File::open(path)
                    .with_context(|| format!("Bad input file: {}", path.display()))?
                    .read_to_end(&mut bytes)
                    .with_context(|| format!("Failed to read input file: {}", path.display()))?;
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Where the decorated script goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Stdout,
    /// An executable file that is kept; nothing is run.
    File(PathBuf),
    /// An executable temp file that is run and then removed.
    Temp,
}

impl Output {
    /// No `--output` means run through a temp file, `-` means stdout.
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            None => Output::Temp,
            Some("-") => Output::Stdout,
            Some(path) => Output::File(PathBuf::from(path)),
        }
    }
}

/// What a driver run ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The decorated script was written to the requested output.
    Written,
    /// The decorated script ran and exited with this code.
    Ran(i32),
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Written => 0,
            Outcome::Ran(code) => code,
        }
    }
}

/// The name a `#!` line uses to invoke this program: the last path
/// component of `argv[0]`.
pub fn program_name() -> String {
    std::env::args()
        .next()
        .map(|arg0| base_name(&arg0).to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

/// Ties the decorator to its input, output and runner.
pub struct Driver<S> {
    pacing: Pacing,
    program: String,
    runner: S,
}

impl<S: ScriptRunner> Driver<S> {
    pub fn new(pacing: Pacing, program: impl Into<String>, runner: S) -> Self {
        Self {
            pacing,
            program: program.into(),
            runner,
        }
    }

    /// Decorate `input` into `output`, running the result if `output` is
    /// [`Output::Temp`].
    pub async fn run<R: Rng>(&self, input: &Input, output: &Output, rng: R) -> Result<Outcome> {
        let source = input
            .read_to_string()
            .context("Failed to choose input stream")?;
        log::debug!("decorating {input:?} into {output:?}");
        let mut decorator = Decorator::new(self.pacing.clone(), self.program.as_str(), rng);

        match output {
            Output::Stdout => {
                write_script(&mut decorator, &source, io::stdout().lock(), "stdout")?;
            }
            Output::File(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create output file: {}", path.display()))?;
                file.set_permissions(Permissions::from_mode(0o755))
                    .with_context(|| format!("Failed to chmod output file: {}", path.display()))?;
                write_script(&mut decorator, &source, file, "output file")?;
            }
            Output::Temp => return self.run_temp(&mut decorator, &source).await,
        }
        Ok(Outcome::Written)
    }

    async fn run_temp<R: Rng>(
        &self,
        decorator: &mut Decorator<R>,
        source: &str,
    ) -> Result<Outcome> {
        let mut temp = tempfile::Builder::new()
            .prefix("demoer.")
            .tempfile()
            .context("Failed to create temp file")?;
        temp.as_file()
            .set_permissions(Permissions::from_mode(0o700))
            .context("Failed to chmod temp file")?;

        write_script(decorator, source, temp.as_file_mut(), "temp file")?;

        // Closing the handle first: a file open for writing cannot be executed.
        let script = temp.into_temp_path();
        let path = std::path::absolute(&script).context("Failed to resolve temp file path")?;
        log::debug!("running {}", path.display());
        let result = self.runner.run(&path).await;

        if let Err(err) = script.close() {
            log::warn!("Failed to remove {}: {err}", path.display());
        }

        let status = result?;
        log::info!("demo script exited with {status}");
        Ok(Outcome::Ran(exit_code(status)))
    }
}

/// Decorate `source` into a buffered `w` and flush it.
///
/// The buffer is flushed even when decoration fails part way, so the
/// statements before a syntax error still reach `w`. A decoration error is
/// reported ahead of a flush error.
fn write_script<R: Rng>(
    decorator: &mut Decorator<R>,
    source: &str,
    w: impl Write,
    what: &str,
) -> Result<()> {
    let mut w = BufWriter::new(w);
    let result = decorator.decorate_script(source, &mut w);
    let flushed = w.flush().with_context(|| format!("Failed to write {what}"));
    result.and(flushed)
}
