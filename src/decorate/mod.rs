//! The statement decorator: wraps every statement of a script in the shell
//! code that types it out, optionally pauses, runs it and waits.
//!
//! For each statement the generated script contains:
//!
//! ```text
//! # line 12
//! read -r -s -n 1    # pause before printing
//! cat <<'EOF_8817263549' | pv -qL 20
//! > make test
//! EOF_8817263549
//! read -r -s -n 1    # pause before running
//! make test
//! sleep 0.8    # wait between statements
//! ```
//!
//! The two `read` lines only appear for statements with a `# pause`
//! directive, see [`pause`].

pub mod pause;
pub mod shebang;
pub mod spacer;

use crate::config::Pacing;
use crate::parser::parse_str;
use crate::render::{Renderer, SourceRenderer};
use crate::statement::Statement;
use anyhow::{Context as _, Result};
use rand::Rng;
use std::io::Write;

pub use pause::{Pauses, detect_pauses, is_pause_directive};
pub use shebang::strip_shebangs;

/// Decorates statements one at a time, in source order.
///
/// `program` is the name a `#!` line uses to invoke demoer itself. `rng`
/// draws the here-document delimiters; pass a seeded generator for
/// reproducible output.
pub struct Decorator<R, N = SourceRenderer> {
    pacing: Pacing,
    program: String,
    rng: R,
    renderer: N,
}

impl<R: Rng> Decorator<R> {
    pub fn new(pacing: Pacing, program: impl Into<String>, rng: R) -> Self {
        Self {
            pacing,
            program: program.into(),
            rng,
            renderer: SourceRenderer,
        }
    }
}

impl<R: Rng, N: Renderer> Decorator<R, N> {
    /// Replace the statement renderer.
    pub fn with_renderer<M: Renderer>(self, renderer: M) -> Decorator<R, M> {
        Decorator {
            pacing: self.pacing,
            program: self.program,
            rng: self.rng,
            renderer,
        }
    }

    /// Decorate a whole script.
    ///
    /// Statements are written as they are decorated. On a syntax error the
    /// statements before it have already been written and the
    /// [`ParseError`](crate::parser::ParseError) is returned. A statement
    /// that fails to decorate stops the pass immediately.
    pub fn decorate_script(&mut self, source: &str, w: &mut impl Write) -> Result<()> {
        for stmt in parse_str(source)? {
            self.decorate_statement(stmt?, w)?;
        }
        Ok(())
    }

    /// Decorate one statement.
    ///
    /// The block is assembled in memory first so a failure never leaves half
    /// of it in `w`.
    pub fn decorate_statement(&mut self, stmt: Statement, w: &mut impl Write) -> Result<()> {
        let comment_count = stmt.comments.len();
        let (shebangs, stmt) = strip_shebangs(stmt, &self.program);
        let after_shebang = stmt.comments.len() < comment_count;
        let rendered = self
            .renderer
            .render(&stmt)
            .with_context(|| format!("Failed to render statement at line {}", stmt.start_line))?;

        let mut block = Vec::new();
        for line in &shebangs {
            writeln!(block, "{line}")?;
        }
        spacer::write_provenance(&mut block, &stmt, after_shebang)?;

        let pauses = detect_pauses(&stmt);
        let eof = self.delimiter();
        let pacing = &self.pacing;
        if pauses.before_printing {
            writeln!(block, "{}    # pause before printing", pacing.pause)?;
        }

        writeln!(
            block,
            "cat <<'{eof}' | {} {}",
            pacing.pacer, pacing.typing_rate
        )?;
        for line in rendered.lines() {
            writeln!(block, "> {line}")?;
        }
        writeln!(block, "{eof}")?;

        if pauses.before_running {
            writeln!(block, "{}    # pause before running", pacing.pause)?;
        }
        writeln!(block, "{rendered}")?;
        writeln!(block, "sleep {}    # wait between statements", pacing.delay)?;

        w.write_all(&block)
            .with_context(|| format!("Failed to write statement at line {}", stmt.start_line))
    }

    /// A fresh here-document delimiter. Every preview line starts with `> `,
    /// so no line of the body can equal it.
    fn delimiter(&mut self) -> String {
        format!(
            "{}{}",
            self.pacing.delimiter_prefix,
            self.rng.gen_range(0..i64::MAX)
        )
    }
}
