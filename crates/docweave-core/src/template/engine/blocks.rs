//! Repeated region matching
//!
//! A unit is whatever the engine duplicates (a paragraph, a table row, a
//! sheet row). Each unit exposes its text as segments (one per paragraph or
//! cell) so that a marker can be located again when it is stripped.

use super::tokenize::{active_tokens, TokenKind};
use std::collections::HashMap;

/// Position of a token inside a unit list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub unit: usize,
    pub segment: usize,
    pub start: usize,
    pub end: usize,
}

/// `{{path}}` ... `{{/path}}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub path: String,
    pub open: Marker,
    pub close: Marker,
}

/// Pair every `{{/path}}` with the nearest unclosed `{{path}}` before it
///
/// Openers without a closer are ordinary placeholders and are not returned.
/// Regions come back ordered by opener position.
pub fn find_regions<S: AsRef<str>>(units: &[Vec<S>]) -> Vec<Region> {
    let mut open: HashMap<String, Vec<Marker>> = HashMap::new();
    let mut regions = Vec::new();

    for (unit, segments) in units.iter().enumerate() {
        for (segment, text) in segments.iter().enumerate() {
            for token in active_tokens(text.as_ref()) {
                let marker = Marker {
                    unit,
                    segment,
                    start: token.start,
                    end: token.end(),
                };
                match token.kind {
                    TokenKind::Placeholder { path } => open.entry(path).or_default().push(marker),
                    TokenKind::BlockEnd { path } => {
                        if let Some(opener) = open.get_mut(&path).and_then(Vec::pop) {
                            regions.push(Region {
                                path,
                                open: opener,
                                close: marker,
                            });
                        }
                    }
                    TokenKind::Command { .. } => {}
                }
            }
        }
    }

    regions.sort_by_key(|r| (r.open.unit, r.open.segment, r.open.start));
    regions
}

/// The outermost region opening in `unit`: the one reaching furthest down
pub fn region_opening_at(regions: &[Region], unit: usize) -> Option<&Region> {
    regions
        .iter()
        .filter(|r| r.open.unit == unit)
        .fold(None, |best: Option<&Region>, r| match best {
            Some(b) if b.close.unit >= r.close.unit => Some(b),
            _ => Some(r),
        })
}
