//! Statement source: splits shell source into top-level [`Statement`]s.
//!
//! The top-level entry points are [`parse_str`] and [`parse_file`]. Both
//! return a [`Statements`] iterator that yields statements in source order
//! and ends with a [`ParseError`] item if the script is malformed, after
//! every statement before the error has been yielded.
//!
//! Comments are attached the way a reader groups them: every comment since
//! the previous statement belongs to the next statement, and a comment on the
//! line a statement starts or ends on belongs to that statement.

use crate::statement::{Comment, Statement};
use anyhow::{Context as _, Result, anyhow};
use std::fmt;
use std::iter::Peekable;
use std::path::Path;
use tree_sitter::{Node, Parser};

/// A syntax error in the input script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line of the offending token.
    pub line: usize,
    /// 1-based column of the offending token.
    pub column: usize,
    pub near: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "syntax error at line {}, column {} near {:?}",
            self.line, self.column, self.near
        )
    }
}

impl std::error::Error for ParseError {}

/// Parse a shell script held in memory.
///
/// # Errors
///
/// Returns an error only if the bash grammar cannot be loaded. Syntax errors
/// are reported through the returned iterator.
///
/// # Example
///
/// ```
/// use demoer::parse_str;
///
/// let statements: Vec<_> = parse_str("cd /tmp\nls -la\n").unwrap().collect();
/// assert_eq!(statements.len(), 2);
/// ```
pub fn parse_str(source: &str) -> Result<Statements> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_bash::LANGUAGE.into())
        .context("Failed to load the bash grammar")?;
    let tree = parser
        .parse(source, None)
        .ok_or_else(|| anyhow!("Shell parser produced no syntax tree"))?;

    let items = collect_items(tree.root_node(), source);
    Ok(Statements {
        source: source.to_string(),
        items: items.into_iter().peekable(),
        pending: Vec::new(),
    })
}

/// Parse a shell script from a file.
///
/// Reads the entire file into memory and delegates to [`parse_str`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<Statements> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script file: {}", path.display()))?;
    parse_str(&content)
}

/// Byte range and line span of a top-level statement node, with the
/// comments found inside its first line.
#[derive(Debug, Clone)]
struct Span {
    start_line: usize,
    last_line: usize,
    start_byte: usize,
    end_byte: usize,
    embedded: Vec<Comment>,
}

#[derive(Debug)]
enum Entry {
    Comment(Comment),
    Statement(Span),
    Error(ParseError),
}

/// Iterator over the statements of a parsed script.
pub struct Statements {
    source: String,
    items: Peekable<std::vec::IntoIter<Entry>>,
    pending: Vec<Comment>,
}

impl Iterator for Statements {
    type Item = std::result::Result<Statement, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(item) = self.items.next() {
            match item {
                Entry::Comment(comment) => self.pending.push(comment),
                Entry::Error(err) => return Some(Err(err)),
                Entry::Statement(span) => {
                    let mut comments = std::mem::take(&mut self.pending);
                    comments.extend(span.embedded);
                    let last_line = span.last_line;
                    while let Some(Entry::Comment(trailing)) = self.items.next_if(
                        |next| matches!(next, Entry::Comment(c) if c.line == last_line),
                    ) {
                        comments.push(trailing);
                    }
                    let source = self.source[span.start_byte..span.end_byte]
                        .trim_end_matches(['\n', '\r'])
                        .to_string();
                    return Some(Ok(Statement {
                        start_line: span.start_line,
                        comments,
                        source,
                    }));
                }
            }
        }

        if !self.pending.is_empty() {
            log::debug!(
                "dropping {} comment(s) after the last statement",
                self.pending.len()
            );
            self.pending.clear();
        }
        None
    }
}

/// Flatten the children of the `program` node into comments and statements,
/// stopping at the first syntax error.
fn collect_items(root: Node<'_>, source: &str) -> Vec<Entry> {
    let mut items = Vec::new();
    let mut cursor = root.walk();

    for child in root.children(&mut cursor) {
        if child.has_error() || child.is_missing() {
            items.push(Entry::Error(parse_error(child, source)));
            break;
        }

        match child.kind() {
            "comment" => items.push(Entry::Comment(Comment::new(
                child.start_position().row + 1,
                comment_text(child, source),
            ))),
            // A backgrounding `&` is a terminator in the grammar but part of
            // the command when it runs. Older grammars also emit here-document
            // bodies as siblings of their statement.
            "&" | "heredoc_body" => {
                if let Some(Entry::Statement(span)) = items.last_mut() {
                    span.end_byte = child.end_byte();
                    span.last_line = last_line(child);
                }
            }
            _ if child.is_named() => {
                let mut embedded = Vec::new();
                first_line_comments(child, child.start_position().row, source, &mut embedded);
                items.push(Entry::Statement(Span {
                    start_line: child.start_position().row + 1,
                    last_line: last_line(child),
                    start_byte: child.start_byte(),
                    end_byte: child.end_byte(),
                    embedded,
                }));
            }
            _ => {}
        }
    }

    items
}

/// Collect the `comment` nodes under `node` that start on `row`.
///
/// The grammar keeps a comment after a here-document's `<<EOF` inside the
/// statement, since the body only starts on the next line.
fn first_line_comments(node: Node<'_>, row: usize, source: &str, out: &mut Vec<Comment>) {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.start_position().row > row {
            break;
        }
        if child.kind() == "comment" {
            out.push(Comment::embedded(row + 1, comment_text(child, source)));
        } else {
            first_line_comments(child, row, source, out);
        }
    }
}

/// Comment text without the `#`.
fn comment_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    let text = node_text(node, source);
    text.strip_prefix('#').unwrap_or(text).trim_end_matches('\r')
}

/// 1-based line holding the node's last character.
fn last_line(node: Node<'_>) -> usize {
    let start = node.start_position();
    let end = node.end_position();
    // Nodes that swallow their final newline end at column 0 of the next row.
    if end.column == 0 && end.row > start.row {
        end.row
    } else {
        end.row + 1
    }
}

fn node_text<'a>(node: Node<'_>, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

fn parse_error(node: Node<'_>, source: &str) -> ParseError {
    let culprit = first_error(node);
    let position = culprit.start_position();
    let near = node_text(culprit, source)
        .lines()
        .next()
        .unwrap_or_default()
        .chars()
        .take(40)
        .collect();
    ParseError {
        line: position.row + 1,
        column: position.column + 1,
        near,
    }
}

/// Descend to the innermost error or missing node under `node`.
fn first_error<'tree>(node: Node<'tree>) -> Node<'tree> {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_error() || child.is_missing() {
            return child;
        }
        if child.has_error() {
            return first_error(child);
        }
    }
    node
}
