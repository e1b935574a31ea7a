//! Template expansion engines
//!
//! Both variants share the token grammar:
//!
//! - `{{path}}`: scalar substitution, or opens a repeated region when a
//!   matching `{{/path}}` follows
//! - `{{/path}}`: closes the region
//! - `{{keyword args}}`: custom command, dispatched only if `keyword`
//!   resolves to a custom placeholder
//! - `\{{...}}`: literal token; backslash pairs render as one backslash
//!
//! A SET on a region opener repeats the region once per element, resolving
//! the copies against the element's resolver. A region whose path does not
//! resolve is removed; SCALAR or CUSTOM data expands it once in place.

pub mod blocks;
mod sheet;
pub mod text;
pub mod tokenize;
mod word;

pub use sheet::{RowOffset, SheetEngine};
pub use word::WordEngine;

use crate::error::Result;
use crate::locale::Locale;
use crate::placeholder::{CustomPlaceholder, PlaceholderData, PlaceholderResolver};
use std::sync::Arc;
use tokenize::{active_tokens, Token, TokenKind};

/// What a token in running text becomes, `None` keeps it verbatim
fn substitute(
    token: &Token,
    resolver: &dyn PlaceholderResolver,
    locale: &Locale,
) -> Result<Option<String>> {
    let TokenKind::Placeholder { path } = &token.kind else {
        return Ok(None);
    };

    match resolver.resolve(path, locale)? {
        Some(PlaceholderData::Scalar(value)) => Ok(Some(value)),
        Some(PlaceholderData::Custom(custom)) => {
            tracing::warn!(
                "Custom placeholder {} shares its text with other content, left as is",
                custom.name()
            );
            Ok(None)
        }
        Some(other) => {
            tracing::debug!(
                "Placeholder {} resolved to {} outside a region, left as is",
                path,
                other.kind()
            );
            Ok(None)
        }
        None => {
            tracing::debug!("Placeholder {} not resolved, left as is", path);
            Ok(None)
        }
    }
}

/// The custom placeholder a text consists of, with its command arguments
fn lone_custom(
    text: &str,
    resolver: &dyn PlaceholderResolver,
    locale: &Locale,
) -> Result<Option<(Arc<dyn CustomPlaceholder>, String)>> {
    let mut tokens = active_tokens(text);
    let (Some(token), None) = (tokens.next(), tokens.next()) else {
        return Ok(None);
    };
    if token.backslash_count > 0 || text.trim() != &text[token.start..token.end()] {
        return Ok(None);
    }

    let (name, args) = match token.kind {
        TokenKind::Placeholder { path } => (path, String::new()),
        TokenKind::Command { keyword, args } => (keyword, args),
        TokenKind::BlockEnd { .. } => return Ok(None),
    };

    match resolver.resolve(&name, locale)? {
        Some(PlaceholderData::Custom(custom)) => Ok(Some((custom, args))),
        _ => Ok(None),
    }
}

/// How a region opener resolved
enum Repetition {
    /// Once per element resolver
    Each(Vec<Arc<dyn PlaceholderResolver>>),
    /// Once, against the current resolver
    Once,
    /// Not at all
    Removed,
}

fn repetition(
    path: &str,
    resolver: &dyn PlaceholderResolver,
    locale: &Locale,
) -> Result<Repetition> {
    Ok(match resolver.resolve(path, locale)? {
        Some(PlaceholderData::Set(set)) => {
            tracing::debug!("Repeating region {} {} times", path, set.size());
            Repetition::Each(set.iter().cloned().collect())
        }
        Some(_) => Repetition::Once,
        None => {
            tracing::debug!("Region {} not resolved, removed", path);
            Repetition::Removed
        }
    })
}

#[cfg(test)]
mod tests;
