//! `# pause` directives.
//!
//! A pause comment on its own line above the command pauses before the
//! command is even shown:
//!
//! ```text
//! # pause
//! command args...
//! ```
//!
//! A pause comment on the command's first line shows the command, then
//! pauses before running it:
//!
//! ```text
//! command args... # pause
//! ```

use crate::statement::Statement;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Pauses {
    pub before_printing: bool,
    pub before_running: bool,
}

/// True when the whole comment text is the word `pause`, in any case, with
/// optional surrounding whitespace (the POSIX `[[:space:]]` set).
pub fn is_pause_directive(text: &str) -> bool {
    text.trim_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r'))
        .eq_ignore_ascii_case("pause")
}

pub fn detect_pauses(stmt: &Statement) -> Pauses {
    let mut pauses = Pauses::default();
    for comment in stmt.comments.iter().filter(|c| is_pause_directive(&c.text)) {
        if comment.line < stmt.start_line {
            pauses.before_printing = true;
        } else {
            pauses.before_running = true;
        }
    }
    pauses
}
