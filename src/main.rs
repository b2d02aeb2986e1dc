use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use demoer::driver::program_name;
use demoer::{Config, Driver, Input, Outcome, Output, ProcessRunner, logging};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "demoer",
    about = "Turn a shell script into a paced, typed-out terminal demo and run it",
    version
)]
struct Args {
    /// Script to turn into a demo, or `-` for standard input
    input: Option<String>,

    /// Instead of running the demo, write it to FILE (`-` for stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<String>,

    /// Pacing overrides (default: ~/.config/demoer/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// More diagnostics on stderr (repeat for debug output)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    logging::init(logging::level(args.verbose, args.quiet));

    let Some(input) = args.input.as_deref() else {
        eprintln!("ERROR: no input file given\n");
        let _ = Args::command().write_help(&mut std::io::stderr());
        return ExitCode::FAILURE;
    };

    match run(&args, input).await {
        Ok(outcome) => ExitCode::from(outcome.exit_code() as u8),
        Err(err) => {
            eprintln!("ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args, input: &str) -> Result<Outcome> {
    let config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    let driver = Driver::new(config.pacing, program_name(), ProcessRunner);
    driver
        .run(
            &Input::from_arg(input),
            &Output::from_arg(args.output.as_deref()),
            StdRng::from_entropy(),
        )
        .await
}
