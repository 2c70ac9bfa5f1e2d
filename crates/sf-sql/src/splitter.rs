//! Statement splitter for migration files.
//!
//! Boundaries are `;` tokens produced by the sqlparser tokenizer, so quote
//! and comment state is tracked by the dialect rather than by a raw string
//! split. Statement text is sliced from the original source using token
//! locations, which keeps every byte of the statement as written.

use crate::dialect::{DuckDbDialect, SqlDialect};
use crate::error::{SqlError, SqlResult};
use sqlparser::tokenizer::{Location, Token, Tokenizer};

/// Splits SQL text into individual statements for a dialect.
pub struct StatementSplitter {
    dialect: Box<dyn SqlDialect>,
}

impl StatementSplitter {
    /// Create a splitter for the DuckDB dialect
    pub fn duckdb() -> Self {
        Self {
            dialect: Box::new(DuckDbDialect::new()),
        }
    }

    /// Create a splitter for an arbitrary dialect
    pub fn with_dialect(dialect: Box<dyn SqlDialect>) -> Self {
        Self { dialect }
    }

    /// Get the dialect name
    pub fn dialect_name(&self) -> &'static str {
        self.dialect.name()
    }

    /// Split `sql` into trimmed statements without their terminating `;`.
    ///
    /// Segments holding only whitespace or comments are dropped. Fails if the
    /// text cannot be tokenized (for example an unterminated string literal).
    pub fn split(&self, sql: &str) -> SqlResult<Vec<String>> {
        let tokens = Tokenizer::new(self.dialect.parser_dialect(), sql)
            .with_unescape(false)
            .tokenize_with_location()
            .map_err(|e| SqlError::Tokenize {
                message: e.message,
                line: e.location.line,
                column: e.location.column,
            })?;

        let index = LineIndex::new(sql);
        let mut statements = Vec::new();
        let mut start = 0;
        let mut has_code = false;

        for token in &tokens {
            match &token.token {
                Token::SemiColon => {
                    let end = index.offset(token.span.start).max(start);
                    push_segment(&mut statements, &sql[start..end], has_code);
                    start = (end + ';'.len_utf8()).min(sql.len());
                    has_code = false;
                }
                Token::Whitespace(_) | Token::EOF => {}
                _ => has_code = true,
            }
        }
        push_segment(&mut statements, &sql[start..], has_code);

        Ok(statements)
    }
}

impl Default for StatementSplitter {
    fn default() -> Self {
        Self::duckdb()
    }
}

/// Split `sql` with the DuckDB dialect.
pub fn split_statements(sql: &str) -> SqlResult<Vec<String>> {
    StatementSplitter::duckdb().split(sql)
}

fn push_segment(statements: &mut Vec<String>, segment: &str, has_code: bool) {
    if has_code {
        statements.push(segment.trim().to_string());
    }
}

/// Maps tokenizer locations (1-based line, 1-based char column) to byte
/// offsets in the source.
struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    fn offset(&self, location: Location) -> usize {
        let line = location.line.saturating_sub(1) as usize;
        let column = location.column.saturating_sub(1) as usize;
        let Some(&line_start) = self.line_starts.get(line) else {
            return self.source.len();
        };
        self.source[line_start..]
            .char_indices()
            .nth(column)
            .map(|(i, _)| line_start + i)
            .unwrap_or(self.source.len())
    }
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
