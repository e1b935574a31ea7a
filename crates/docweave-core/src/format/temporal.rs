//! Date/time formatting with `dd.MM.yyyy`-style patterns
//!
//! Patterns are compiled once into a chrono format string. Letters follow the
//! usual pattern-letter conventions (`y`, `M`, `d`, `H`, `h`, `m`, `s`, `S`,
//! `a`, `E`); text between single quotes is literal and `''` is a quote.

use crate::error::{DocweaveError, Result};
use crate::locale::Locale;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::fmt::Write;

/// A temporal value carrying a date, a time, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFormatter {
    pattern: String,
    compiled: String,
}

impl DateTimeFormatter {
    pub fn of_pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: pattern.to_string(),
            compiled: compile(pattern)?,
        })
    }

    /// The locale's SHORT style for the kind of value
    pub fn short_for(locale: &Locale, value: &Temporal) -> Self {
        let patterns = locale.short_patterns();
        let pattern = match value {
            Temporal::Date(_) => patterns.date,
            Temporal::Time(_) => patterns.time,
            Temporal::DateTime(_) => patterns.date_time,
        };
        Self {
            pattern: pattern.to_string(),
            compiled: compile(pattern).unwrap_or_else(|_| "%F".to_string()),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Fails when the pattern asks for a field the value lacks (e.g. `yyyy` on a time)
    pub fn format(&self, value: &Temporal) -> Result<String> {
        let mut out = String::new();
        let written = match value {
            Temporal::Date(d) => write!(out, "{}", d.format(&self.compiled)),
            Temporal::Time(t) => write!(out, "{}", t.format(&self.compiled)),
            Temporal::DateTime(dt) => write!(out, "{}", dt.format(&self.compiled)),
        };
        written.map_err(|_| DocweaveError::PatternInvalid {
            pattern: self.pattern.clone(),
            reason: format!("not applicable to {:?}", value),
        })?;
        Ok(out)
    }
}

fn compile(pattern: &str) -> Result<String> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '\'' {
            if chars.get(i + 1) == Some(&'\'') {
                out.push('\'');
                i += 2;
                continue;
            }
            let close = chars[i + 1..]
                .iter()
                .position(|&ch| ch == '\'')
                .ok_or_else(|| DocweaveError::PatternInvalid {
                    pattern: pattern.to_string(),
                    reason: "unterminated quote".to_string(),
                })?;
            for &literal in &chars[i + 1..i + 1 + close] {
                push_literal(&mut out, literal);
            }
            i += close + 2;
            continue;
        }

        if !c.is_ascii_alphabetic() {
            push_literal(&mut out, c);
            i += 1;
            continue;
        }

        let run = chars[i..].iter().take_while(|&&ch| ch == c).count();
        let spec = match (c, run) {
            ('y' | 'u', 2) => "%y",
            ('y' | 'u', _) => "%Y",
            ('M' | 'L', 1) => "%-m",
            ('M' | 'L', 2) => "%m",
            ('M' | 'L', 3) => "%b",
            ('M' | 'L', _) => "%B",
            ('d', 1) => "%-d",
            ('d', _) => "%d",
            ('D', _) => "%j",
            ('E', 4..) => "%A",
            ('E', _) => "%a",
            ('a', _) => "%p",
            ('H', 1) => "%-H",
            ('H', _) => "%H",
            ('h', 1) => "%-I",
            ('h', _) => "%I",
            ('m', 1) => "%-M",
            ('m', _) => "%M",
            ('s', 1) => "%-S",
            ('s', _) => "%S",
            ('S', 1..=3) => "%3f",
            ('S', 4..=6) => "%6f",
            ('S', _) => "%9f",
            _ => {
                return Err(DocweaveError::PatternInvalid {
                    pattern: pattern.to_string(),
                    reason: format!("unsupported pattern letter '{}'", c),
                })
            }
        };
        out.push_str(spec);
        i += run;
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}
