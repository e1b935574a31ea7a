//! Locale model used for number and date formatting
//!
//! Covers the handful of conventions the formatters need: separators, the
//! placement of percent and currency signs, a region's default currency and
//! the SHORT date/time patterns. Unknown languages fall back to English
//! symbols and ISO-style date patterns.

use crate::error::{DocweaveError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// No-break space, used by CLDR between a number and a trailing sign
const NBSP: char = '\u{a0}';
/// Narrow no-break space, French grouping separator
const NNBSP: char = '\u{202f}';

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Locale {
    language: String,
    region: Option<String>,
}

/// Where a sign goes relative to the digits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affix {
    /// `$12.50`
    Prefix,
    /// `12,50 €` (separated by a no-break space)
    Suffix,
    /// `12%`
    SuffixTight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberSymbols {
    pub decimal: char,
    pub grouping: char,
    pub percent: Affix,
    pub currency: Affix,
}

/// SHORT date, time and date-time patterns in `dd.MM.yyyy` syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortPatterns {
    pub date: &'static str,
    pub time: &'static str,
    pub date_time: &'static str,
}

impl Locale {
    pub fn new(language: &str, region: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            region: region.map(|r| r.to_ascii_uppercase()),
        }
    }

    /// Parse `en-US`, `en_US`, `de` (case-insensitive)
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.trim().split(['-', '_']);
        let language = parts.next().unwrap_or_default();
        if language.len() < 2
            || language.len() > 3
            || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(DocweaveError::ConfigInvalidValue {
                field: "locale".to_string(),
                reason: format!("'{}' is not a language tag", tag),
            });
        }
        let region = parts
            .next()
            .filter(|r| !r.is_empty() && r.chars().all(|c| c.is_ascii_alphanumeric()));
        Ok(Self::new(language, region))
    }

    pub fn en_us() -> Self {
        Self::new("en", Some("US"))
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn number_symbols(&self) -> NumberSymbols {
        match (self.language.as_str(), self.region()) {
            ("de", Some("CH")) => NumberSymbols {
                decimal: '.',
                grouping: '’',
                percent: Affix::SuffixTight,
                currency: Affix::Prefix,
            },
            ("de", _) | ("nl", _) | ("it", _) | ("es", _) | ("pt", _) => NumberSymbols {
                decimal: ',',
                grouping: '.',
                percent: Affix::Suffix,
                currency: Affix::Suffix,
            },
            ("fr", _) => NumberSymbols {
                decimal: ',',
                grouping: NNBSP,
                percent: Affix::Suffix,
                currency: Affix::Suffix,
            },
            _ => NumberSymbols {
                decimal: '.',
                grouping: ',',
                percent: Affix::SuffixTight,
                currency: Affix::Prefix,
            },
        }
    }

    /// The ISO 4217 currency of the locale's region, if the region is known
    pub fn default_currency(&self) -> Option<&'static str> {
        let code = match self.region()? {
            "US" | "EC" | "SV" | "PR" => "USD",
            "GB" => "GBP",
            "CH" | "LI" => "CHF",
            "JP" => "JPY",
            "CA" => "CAD",
            "AU" => "AUD",
            "SE" => "SEK",
            "NO" => "NOK",
            "DK" => "DKK",
            "PL" => "PLN",
            "AT" | "DE" | "FR" | "IT" | "ES" | "NL" | "BE" | "LU" | "IE" | "PT" | "FI" | "GR"
            | "SK" | "SI" | "EE" | "LV" | "LT" | "MT" | "CY" | "HR" => "EUR",
            _ => return None,
        };
        Some(code)
    }

    pub fn short_patterns(&self) -> ShortPatterns {
        match (self.language.as_str(), self.region()) {
            ("en", Some("US")) | ("en", None) => ShortPatterns {
                date: "M/d/yy",
                time: "h:mm a",
                date_time: "M/d/yy, h:mm a",
            },
            ("en", _) => ShortPatterns {
                date: "dd/MM/y",
                time: "HH:mm",
                date_time: "dd/MM/y, HH:mm",
            },
            ("de", _) => ShortPatterns {
                date: "dd.MM.yy",
                time: "HH:mm",
                date_time: "dd.MM.yy, HH:mm",
            },
            ("fr", _) | ("it", _) | ("es", _) => ShortPatterns {
                date: "dd/MM/y",
                time: "HH:mm",
                date_time: "dd/MM/y HH:mm",
            },
            _ => ShortPatterns {
                date: "yyyy-MM-dd",
                time: "HH:mm",
                date_time: "yyyy-MM-dd HH:mm",
            },
        }
    }

    pub(crate) fn nbsp() -> char {
        NBSP
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::en_us()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}-{}", self.language, region),
            None => write!(f, "{}", self.language),
        }
    }
}

impl FromStr for Locale {
    type Err = DocweaveError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = DocweaveError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.to_string()
    }
}

/// Symbol and default fraction digits for an ISO 4217 code
///
/// Well-formed codes without a known symbol use the code itself with two
/// fraction digits.
pub(crate) fn currency_info(code: &str) -> Result<(String, u32)> {
    let code = code.trim().to_ascii_uppercase();
    let (symbol, digits) = match code.as_str() {
        "USD" => ("$", 2),
        "EUR" => ("€", 2),
        "GBP" => ("£", 2),
        "JPY" => ("¥", 0),
        "CAD" => ("CA$", 2),
        "AUD" => ("A$", 2),
        "KRW" => ("₩", 0),
        "XXX" => ("¤", 2),
        other if other.len() == 3 && other.chars().all(|c| c.is_ascii_alphabetic()) => {
            (other, 2)
        }
        _ => return Err(DocweaveError::CurrencyUnknown(code.clone())),
    };
    Ok((symbol.to_string(), digits))
}
