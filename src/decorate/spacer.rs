//! Blank-line spacing and the `# line N` provenance comment.

use crate::statement::Statement;
use std::io::{self, Write};

/// Whether a blank line separates this statement's block from the previous
/// output. The first block of the script, or the block right after the
/// `#!` lines, starts without one.
pub fn needs_spacer(stmt: &Statement, after_shebang: bool) -> bool {
    !after_shebang && stmt.reference_line() != 1
}

/// Write the optional blank line and the comment pointing back at the
/// statement's line in the input script.
pub fn write_provenance(
    w: &mut impl Write,
    stmt: &Statement,
    after_shebang: bool,
) -> io::Result<()> {
    if needs_spacer(stmt, after_shebang) {
        writeln!(w)?;
    }
    writeln!(w, "# line {}", stmt.reference_line())
}
