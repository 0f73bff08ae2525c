//! Statement builder.
//!
//! Statements are assembled from chunks that keep trusted identifiers apart
//! from encoded literals. Identifiers are validated once, when a schema is
//! built (see [`validate_identifier`]); literals only ever come out of the
//! literal encoder. Raw chunks are keywords and punctuation written by this
//! workspace, plus caller-supplied predicates passed to `where`.

use std::borrow::Cow;
use std::fmt::{self, Display, Write};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, TetherError};

/// PostgreSQL truncates identifiers longer than `NAMEDATALEN - 1` bytes.
pub const MAX_IDENTIFIER_LEN: usize = 63;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("identifier pattern is valid")
});

/// Checks that `name` can be interpolated as a quoted identifier.
pub fn validate_identifier(name: &str) -> Result<&str> {
    if name.len() > MAX_IDENTIFIER_LEN || !IDENTIFIER.is_match(name) {
        return Err(TetherError::InvalidIdentifier(name.to_string()));
    }
    Ok(name)
}

/// Wraps a procedural body in dollar quotes whose tag does not occur in it.
pub fn dollar_quote(body: &str) -> String {
    let mut tag = String::from("$tether$");
    let mut n = 0usize;
    while body.contains(&tag) {
        n += 1;
        tag = format!("$tether_{n}$");
    }
    format!("{tag}\n{body}\n{tag}")
}

/// One piece of a statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlChunk<'a> {
    /// Keywords, operators and other text written verbatim
    Raw(Cow<'a, str>),
    /// Quoted identifier: renders as `"name"`
    Ident(Cow<'a, str>),
    /// `"table"."column"`
    Qualified(Cow<'a, str>, Cow<'a, str>),
    /// An already-encoded literal
    Literal(String),
}

impl SqlChunk<'_> {
    fn write(&self, buf: &mut impl Write) -> fmt::Result {
        match self {
            SqlChunk::Raw(text) => buf.write_str(text),
            SqlChunk::Ident(name) => write_ident(buf, name),
            SqlChunk::Qualified(table, column) => {
                write_ident(buf, table)?;
                buf.write_char('.')?;
                write_ident(buf, column)
            }
            SqlChunk::Literal(text) => buf.write_str(text),
        }
    }
}

fn write_ident(buf: &mut impl Write, name: &str) -> fmt::Result {
    buf.write_char('"')?;
    for c in name.chars() {
        if c == '"' {
            buf.write_char('"')?;
        }
        buf.write_char(c)?;
    }
    buf.write_char('"')
}

/// SQL statement builder with flat chunk storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sql<'a> {
    chunks: Vec<SqlChunk<'a>>,
}

impl<'a> Sql<'a> {
    #[inline]
    pub const fn empty() -> Self {
        Self { chunks: Vec::new() }
    }

    /// Starts a statement with raw text
    #[inline]
    pub fn raw(text: impl Into<Cow<'a, str>>) -> Self {
        Self::empty().push_raw(text)
    }

    /// Starts a statement with a quoted identifier
    #[inline]
    pub fn ident(name: impl Into<Cow<'a, str>>) -> Self {
        Self::empty().push_ident(name)
    }

    #[inline]
    pub fn push_raw(mut self, text: impl Into<Cow<'a, str>>) -> Self {
        self.chunks.push(SqlChunk::Raw(text.into()));
        self
    }

    #[inline]
    pub fn push_ident(mut self, name: impl Into<Cow<'a, str>>) -> Self {
        self.chunks.push(SqlChunk::Ident(name.into()));
        self
    }

    #[inline]
    pub fn push_qualified(
        mut self,
        table: impl Into<Cow<'a, str>>,
        column: impl Into<Cow<'a, str>>,
    ) -> Self {
        self.chunks
            .push(SqlChunk::Qualified(table.into(), column.into()));
        self
    }

    #[inline]
    pub fn push_literal(mut self, literal: impl Into<String>) -> Self {
        self.chunks.push(SqlChunk::Literal(literal.into()));
        self
    }

    /// Appends every chunk of `other`
    pub fn append(mut self, other: Sql<'a>) -> Self {
        self.chunks.extend(other.chunks);
        self
    }

    /// Joins fragments with a raw separator
    pub fn join<I>(parts: I, separator: &'static str) -> Self
    where
        I: IntoIterator<Item = Sql<'a>>,
    {
        let mut out = Self::empty();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                out = out.push_raw(separator);
            }
            out = out.append(part);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn chunks(&self) -> &[SqlChunk<'a>] {
        &self.chunks
    }

    /// Renders the statement text
    pub fn sql(&self) -> String {
        self.to_string()
    }
}

impl Display for Sql<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in &self.chunks {
            chunk.write(f)?;
        }
        Ok(())
    }
}
