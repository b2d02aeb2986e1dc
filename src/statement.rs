//! The data model handed from the [parser](crate::parser) to the
//! [decorator](crate::decorate).

/// A `#` comment from the input script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// 1-based line the `#` appears on.
    pub line: usize,
    /// Everything after the `#`, without the trailing newline.
    pub text: String,
    /// The comment sits inside the statement's source text, as on the
    /// opening line of a here-document, so it is already printed with it.
    pub embedded: bool,
}

impl Comment {
    pub fn new(line: usize, text: impl Into<String>) -> Self {
        Self {
            line,
            text: text.into(),
            embedded: false,
        }
    }

    pub fn embedded(line: usize, text: impl Into<String>) -> Self {
        Self {
            embedded: true,
            ..Self::new(line, text)
        }
    }

    /// True for `#!` interpreter lines.
    pub fn is_shebang(&self) -> bool {
        self.text.starts_with('!')
    }
}

/// One top-level shell command or block, with the comments attached to it.
///
/// `comments` holds the unclaimed comments above the statement, the comments
/// inside its first line and a comment trailing its last line, ordered by
/// line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    /// 1-based line of the statement's first token.
    pub start_line: usize,
    pub comments: Vec<Comment>,
    /// Verbatim source text of the statement. Only embedded comments are
    /// part of it.
    pub source: String,
}

impl Statement {
    /// Create a statement with no attached comments.
    pub fn new(start_line: usize, source: impl Into<String>) -> Self {
        Self {
            start_line,
            comments: Vec::new(),
            source: source.into(),
        }
    }

    /// Attach a comment, builder style.
    pub fn with_comment(mut self, line: usize, text: impl Into<String>) -> Self {
        self.comments.push(Comment::new(line, text));
        self
    }

    /// The line a reader would point at for this statement: its first
    /// comment if it has any, otherwise its first token.
    pub fn reference_line(&self) -> usize {
        self.comments
            .first()
            .map_or(self.start_line, |comment| comment.line)
    }
}
