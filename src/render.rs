//! Turning a [`Statement`] back into shell source.

use crate::statement::Statement;
use anyhow::{Result, bail};

/// Serializes a statement to shell source text.
///
/// The text must be valid shell on its own and must not end in a newline;
/// the decorator adds line breaks around it.
pub trait Renderer {
    fn render(&self, stmt: &Statement) -> Result<String>;
}

/// Renders a statement from its original source text.
///
/// Comments above the statement are printed on their own lines, comments on
/// or after its first line are appended to it, so a `# pause` on the command
/// line is still visible in the typed preview. Embedded comments are already
/// in the source text.
#[derive(Debug, Default, Clone, Copy)]
pub struct SourceRenderer;

impl Renderer for SourceRenderer {
    fn render(&self, stmt: &Statement) -> Result<String> {
        let source = stmt.source.trim_end();
        if source.trim().is_empty() {
            bail!("Statement at line {} has no source text", stmt.start_line);
        }

        let mut out = String::new();
        for comment in stmt.comments.iter().filter(|c| c.line < stmt.start_line) {
            out.push('#');
            out.push_str(&comment.text);
            out.push('\n');
        }
        out.push_str(source);
        let beside = stmt
            .comments
            .iter()
            .filter(|c| c.line >= stmt.start_line && !c.embedded);
        for comment in beside {
            out.push_str(" #");
            out.push_str(&comment.text);
        }
        Ok(out)
    }
}
