//! Definition-body normalisation.
//!
//! Views, routines, synonyms and triggers are compared on their cleaned
//! text so that comment and formatting drift between two databases is not
//! reported as a difference. Cleaning is deterministic and idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static COMMA: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]*,[ \t]*").expect("comma pattern is valid"));

/// Clean a definition body for semantic comparison.
///
/// Block and line comments are replaced by a single space, whitespace runs
/// are collapsed when `strip_whitespace` is set, spacing around commas is
/// normalised to `", "`, and the result is trimmed. Comment markers inside
/// string literals and quoted identifiers are left alone.
pub fn clean_definition(text: &str, strip_whitespace: bool) -> String {
    let uncommented = strip_comments(text);
    let collapsed = if strip_whitespace {
        WHITESPACE.replace_all(&uncommented, " ").into_owned()
    } else {
        uncommented
    };
    COMMA.replace_all(&collapsed, ", ").trim().to_string()
}

/// Whether two definition bodies differ once cleaned.
pub fn definitions_differ(first: &str, second: &str, strip_whitespace: bool) -> bool {
    first != second && clean_definition(first, strip_whitespace) != clean_definition(second, strip_whitespace)
}

fn strip_comments(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match (c, chars.get(i + 1).copied()) {
            ('-', Some('-')) => {
                i += 2;
                while i < chars.len() && chars[i] != '\n' && chars[i] != '\r' {
                    i += 1;
                }
                out.push(' ');
            }
            ('/', Some('*')) => {
                i = skip_block_comment(&chars, i + 2);
                out.push(' ');
            }
            ('\'', _) | ('"', _) => {
                i = copy_quoted(&chars, i, c, &mut out);
            }
            ('[', _) => {
                i = copy_quoted(&chars, i, ']', &mut out);
            }
            _ => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Skip past the end of a block comment, honouring nesting. An unterminated
/// comment runs to the end of the text.
fn skip_block_comment(chars: &[char], mut i: usize) -> usize {
    let mut depth = 1usize;
    while i < chars.len() && depth > 0 {
        match (chars[i], chars.get(i + 1).copied()) {
            ('/', Some('*')) => {
                depth += 1;
                i += 2;
            }
            ('*', Some('/')) => {
                depth -= 1;
                i += 2;
            }
            _ => i += 1,
        }
    }
    i
}

/// Copy a quoted literal or identifier verbatim, treating a doubled closing
/// character as an escape. Returns the index just past the closing quote.
fn copy_quoted(chars: &[char], start: usize, close: char, out: &mut String) -> usize {
    out.push(chars[start]);
    let mut i = start + 1;
    while i < chars.len() {
        let c = chars[i];
        out.push(c);
        i += 1;
        if c == close {
            if chars.get(i) == Some(&close) {
                out.push(close);
                i += 1;
            } else {
                return i;
            }
        }
    }
    i
}
