//! # Demoer
//!
//! Turn an ordinary shell script into a live terminal demo.
//!
//! Every statement of the input script is wrapped so that, when the
//! generated script runs, the statement is first "typed" onto the screen at
//! a human pace (through `pv`), then executed, followed by a short pause.
//! The result looks like someone driving the terminal by hand.
//!
//! ## Quick start
//!
//! ```
//! use demoer::{Decorator, Pacing};
//! use rand::SeedableRng;
//!
//! # fn main() -> anyhow::Result<()> {
//! let rng = rand::rngs::StdRng::seed_from_u64(42);
//! let mut decorator = Decorator::new(Pacing::default(), "demoer", rng);
//!
//! let mut out = Vec::new();
//! decorator.decorate_script("echo hello\n", &mut out)?;
//!
//! let script = String::from_utf8(out)?;
//! assert!(script.contains("> echo hello\n"));
//! assert!(script.ends_with("echo hello\nsleep 0.8    # wait between statements\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Script directives
//!
//! | In the input | Effect in the demo |
//! |--------------|--------------------|
//! | `# pause` on the line above a command | wait for a key before typing the command |
//! | `command # pause` | type the command, wait for a key, then run it |
//! | `#!/usr/bin/env demoer` on line 1 | dropped; lets the script be run directly |
//! | `#!/bin/bash` right after it | becomes the generated script's interpreter |
//!
//! Both pause forms match the word `pause` in any case, alone in the comment.
//!
//! ## Running a demo
//!
//! The `demoer` binary decorates a script into an executable temp file, runs
//! it with the terminal attached and exits with the script's exit code. With
//! `-o FILE` it writes the decorated script instead of running it.
//!
//! ```text
//! demoer walkthrough.sh
//! demoer -o walkthrough-demo.sh walkthrough.sh
//! cat walkthrough.sh | demoer -o - -
//! ```

pub mod config;
pub mod decorate;
pub mod driver;
pub mod logging;
pub mod parser;
pub mod render;
pub mod runner;
pub mod statement;

pub use config::{Config, Pacing};
pub use decorate::Decorator;
pub use driver::{Driver, Input, Outcome, Output};
pub use parser::{ParseError, parse_file, parse_str};
pub use render::{Renderer, SourceRenderer};
pub use runner::{ProcessRunner, ScriptRunner};
pub use statement::{Comment, Statement};
