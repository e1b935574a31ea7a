//! Token substitution inside a single text segment

use super::tokenize::{Token, TokenStream};
use crate::error::Result;

/// Replacement of the byte span `start..end`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// Plan the edits for one text
///
/// `substitute` returns the text a token becomes, or `None` to keep it
/// verbatim. Escaped tokens lose one backslash and stay literal; backslash
/// pairs in front of a token render as one backslash each.
pub fn plan_edits<F>(text: &str, mut substitute: F) -> Result<Vec<Edit>>
where
    F: FnMut(&Token) -> Result<Option<String>>,
{
    let mut edits = Vec::new();

    for token in TokenStream::new(text) {
        let halved = "\\".repeat(token.backslash_count / 2);

        if token.is_escaped() {
            edits.push(Edit {
                start: token.escape_start(),
                end: token.end(),
                replacement: format!("{}{}", halved, &text[token.start..token.end()]),
            });
            continue;
        }

        match substitute(&token)? {
            Some(value) => edits.push(Edit {
                start: token.escape_start(),
                end: token.end(),
                replacement: halved + &value,
            }),
            None if token.backslash_count > 0 => edits.push(Edit {
                start: token.escape_start(),
                end: token.start,
                replacement: halved,
            }),
            None => {}
        }
    }

    Ok(edits)
}

/// Apply edits planned by [`plan_edits`] to a string
pub fn apply(text: &str, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    for edit in edits {
        out.push_str(&text[pos..edit.start]);
        out.push_str(&edit.replacement);
        pos = edit.end;
    }
    out.push_str(&text[pos..]);
    out
}

/// Remove the span `start..end`
pub fn strip(text: &mut String, start: usize, end: usize) {
    if start <= end && end <= text.len() {
        text.replace_range(start..end, "");
    }
}
