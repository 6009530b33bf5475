//! Lexical layer: the two whitespace/comment-skipping modes and the
//! identifier/quoted-string reader.
//!
//! The split between `ws` and `wsr` is load-bearing, not cosmetic: `ws`
//! must never consume a newline, because the grammar layer's statement
//! disambiguation (see `parser::line_contains_before_boundary`) scans for
//! `=`, `[`, `--`, `->` only up to the next `;` or newline. If `ws` ate
//! newlines the way `wsr` does, that look-ahead could cross a statement
//! boundary and make ambiguous statements parse differently.

use winnow::error::{ContextError, ErrMode};
use winnow::token::take_while;
use winnow::{ModalResult, Parser};

/// Skips spaces, tabs, and newline-free block comments (`/* ... */`).
/// Stops — without erroring — in front of a block comment whose body
/// contains a `\n`, since that comment is only skippable by [`wsr`].
pub fn ws(input: &mut &str) -> ModalResult<()> {
    loop {
        let before = input.len();
        skip_blanks(input);
        if input.starts_with("/*") {
            if !skip_block_comment(input, false) {
                break;
            }
            continue;
        }
        if input.len() == before {
            break;
        }
    }
    Ok(())
}

/// Skips blanks, newlines, line comments (`// ...`), and block comments
/// (which may themselves span multiple lines).
pub fn wsr(input: &mut &str) -> ModalResult<()> {
    loop {
        let before = input.len();
        skip_blanks_and_newlines(input);
        if input.starts_with("//") {
            skip_line_comment(input);
            continue;
        }
        if input.starts_with("/*") {
            skip_block_comment(input, true);
            continue;
        }
        if input.len() == before {
            break;
        }
    }
    Ok(())
}

/// Runs `ws` and reports whether it consumed anything. Used by the
/// attribute-list and node-group grammars, where a bare blank (with no
/// following `,`/`;`) is itself a valid separator.
pub fn ws_consumed(input: &mut &str) -> ModalResult<bool> {
    let before = input.len();
    ws(input)?;
    Ok(input.len() != before)
}

fn skip_blanks(input: &mut &str) {
    let end = input
        .find(|c: char| c != ' ' && c != '\t')
        .unwrap_or(input.len());
    *input = &input[end..];
}

fn skip_blanks_and_newlines(input: &mut &str) {
    let end = input
        .find(|c: char| c != ' ' && c != '\t' && c != '\n' && c != '\r')
        .unwrap_or(input.len());
    *input = &input[end..];
}

fn skip_line_comment(input: &mut &str) {
    let end = input.find('\n').map(|i| i + 1).unwrap_or(input.len());
    *input = &input[end..];
}

/// Skips a `/* ... */` block comment starting at `input`. When
/// `allow_newline` is false and the comment body contains a `\n`, the
/// cursor is left untouched and `false` is returned.
fn skip_block_comment(input: &mut &str, allow_newline: bool) -> bool {
    debug_assert!(input.starts_with("/*"));
    let body = &input[2..];
    match body.find("*/") {
        Some(idx) => {
            if !allow_newline && body[..idx].contains('\n') {
                return false;
            }
            *input = &body[idx + 2..];
            true
        }
        None => false,
    }
}

const UNQUOTED_PUNCTUATION: &[char] = &[
    '+', '*', '.', ':', '!', '?', '$', '%', '&', '@', '(', ')', '<', '>', '\'', '`', '|', '^',
    '~', '\\',
];

fn is_unquoted_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || UNQUOTED_PUNCTUATION.contains(&c)
}

/// Returns `true` if `input` starts with the keyword `kw` followed by
/// something other than an identifier-continuation character (longest
/// match over the unquoted-identifier class, per the grammar's keyword
/// rule).
pub fn is_keyword_at(input: &str, kw: &str) -> bool {
    input.starts_with(kw)
        && !input[kw.len()..]
            .chars()
            .next()
            .is_some_and(is_unquoted_char)
}

fn unterminated_string() -> ErrMode<ContextError> {
    let mut e = ContextError::new();
    e.push(winnow::error::StrContext::Expected(
        winnow::error::StrContextValue::Description("closing '\"'"),
    ));
    ErrMode::Cut(e)
}

fn invalid_escape() -> ErrMode<ContextError> {
    let mut e = ContextError::new();
    e.push(winnow::error::StrContext::Expected(
        winnow::error::StrContextValue::Description(
            "one of the escapes \\\" \\\\ \\/ \\b \\f \\n \\r \\t",
        ),
    ));
    ErrMode::Cut(e)
}

/// Parses an unquoted name: a non-empty run drawn from ASCII
/// alphanumerics, `_`, and the punctuation set DOT permits in bare
/// identifiers (deliberately broad — it also covers numeric literals and
/// attribute-value-shaped tokens).
fn unquoted_name(input: &mut &str) -> ModalResult<String> {
    take_while(1.., is_unquoted_char)
        .parse_next(input)
        .map(|s: &str| s.to_string())
}

/// Parses a `"..."` quoted name with backslash escapes
/// (`\" \\ \/ \b \f \n \r \t`). The unescaped payload is the value; the
/// surrounding quotes are not part of it.
fn quoted_name(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let c = winnow::token::any
            .parse_next(input)
            .map_err(|_: ErrMode<ContextError>| unterminated_string())?;
        match c {
            '"' => break,
            '\\' => {
                let esc = winnow::token::any
                    .parse_next(input)
                    .map_err(|_: ErrMode<ContextError>| unterminated_string())?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    '/' => s.push('/'),
                    'b' => s.push('\u{8}'),
                    'f' => s.push('\u{c}'),
                    'n' => s.push('\n'),
                    'r' => s.push('\r'),
                    't' => s.push('\t'),
                    _ => return Err(invalid_escape()),
                }
            }
            other => s.push(other),
        }
    }
    Ok(s)
}

/// Parses a DOT identifier: quoted if the next character is `"`,
/// unquoted otherwise.
pub fn name(input: &mut &str) -> ModalResult<String> {
    if input.starts_with('"') {
        quoted_name(input)
    } else {
        unquoted_name(input)
    }
}
