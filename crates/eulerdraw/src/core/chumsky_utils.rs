//! Shared chumsky parser utilities
//!
//! All parsers in this crate use rich errors so failures can be reported
//! with a line and column.

use chumsky::error::Rich;
use chumsky::extra;
use chumsky::prelude::*;

/// Parser extra carrying rich, span-aware errors.
pub type RichExtra<'src> = extra::Err<Rich<'src, char>>;

/// Parse optional whitespace including newlines.
///
/// Uses explicit character matching to avoid the "repeated combinator making no progress"
/// issue that can occur with `chumsky::text::whitespace().repeated()`.
pub fn optional_whitespace<'src>() -> impl Parser<'src, &'src str, (), RichExtra<'src>> + Clone {
    one_of(" \t\n\r").repeated().ignored()
}

/// Parse required whitespace (at least one whitespace/newline character).
pub fn whitespace_required<'src>() -> impl Parser<'src, &'src str, (), RichExtra<'src>> + Clone {
    one_of(" \t\n\r").repeated().at_least(1).ignored()
}

/// Convert a byte offset into a 1-based line and 0-based column.
pub fn line_and_column(input: &str, offset: usize) -> (usize, usize) {
    let prefix = input.get(..offset).unwrap_or(input);
    let line = prefix.matches('\n').count() + 1;
    let column = match prefix.rfind('\n') {
        Some(newline) => prefix[newline + 1..].chars().count(),
        None => prefix.chars().count(),
    };
    (line, column)
}
