//! Special treatment for the `#!` line(s).
//!
//! To use demoer as the interpreter of a script, the script starts with two
//! `#!` lines:
//!
//! ```text
//! #!/usr/bin/env demoer
//! #!/bin/bash
//! ```
//!
//! The first one is dropped from the generated script; the second becomes
//! the generated script's own interpreter line.

use crate::statement::Statement;
use std::path::Path;

/// Remove the leading `#!` comments from `stmt`.
///
/// Returns the lines to pass through to the output (with their `#`) and the
/// statement with the shebang comments removed. Nothing is removed unless the
/// first comment is on line 1. A `#!` line whose last word names `program`
/// is dropped silently. Stops at the first comment that is not a `#!` line or
/// that has no words after the `!`.
pub fn strip_shebangs(mut stmt: Statement, program: &str) -> (Vec<String>, Statement) {
    let mut passthrough = Vec::new();
    if stmt.comments.first().is_none_or(|c| c.line != 1) {
        return (passthrough, stmt);
    }

    let mut consumed = 0;
    for comment in &stmt.comments {
        if !comment.is_shebang() || comment.embedded {
            break;
        }
        let Some(interpreter) = comment.text[1..].split_whitespace().last() else {
            break;
        };
        if base_name(interpreter) != program {
            passthrough.push(format!("#{}", comment.text));
        }
        consumed += 1;
    }

    stmt.comments.drain(..consumed);
    (passthrough, stmt)
}

/// Last path component, the way `basename` reports it.
pub fn base_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
}
