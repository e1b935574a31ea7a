//! Locale-aware number formatting

use super::directive::{NumericOptions, RoundingMode};
use crate::error::Result;
use crate::locale::{currency_info, Affix, Locale, NumberSymbols};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// A number ready to be formatted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
    Decimal(Decimal),
}

impl Number {
    fn to_decimal(self) -> Option<Decimal> {
        match self {
            Number::Int(i) => Some(Decimal::from(i)),
            Number::Float(f) => Decimal::from_f64(f),
            Number::Decimal(d) => Some(d),
        }
    }

    fn to_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
            Number::Decimal(d) => d.to_f64().unwrap_or(f64::NAN),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Style {
    Decimal,
    Percent,
    Currency { symbol: String },
}

/// Formats numbers the way a locale writes them
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFormatter {
    symbols: NumberSymbols,
    style: Style,
    min_integer_digits: u32,
    max_integer_digits: Option<u32>,
    min_fraction_digits: u32,
    max_fraction_digits: u32,
    grouping: bool,
    rounding: RoundingMode,
}

impl NumberFormatter {
    /// Locale default: grouping on, zero to three fraction digits
    pub fn for_locale(locale: &Locale) -> Self {
        Self {
            symbols: locale.number_symbols(),
            style: Style::Decimal,
            min_integer_digits: 1,
            max_integer_digits: None,
            min_fraction_digits: 0,
            max_fraction_digits: 3,
            grouping: true,
            rounding: RoundingMode::HalfEven,
        }
    }

    pub fn percent(locale: &Locale, max_fraction_digits: Option<u32>) -> Self {
        Self {
            style: Style::Percent,
            max_fraction_digits: max_fraction_digits.unwrap_or(0),
            ..Self::for_locale(locale)
        }
    }

    /// Currency format; a blank code selects the locale's currency
    pub fn currency(locale: &Locale, currency_code: &str) -> Result<Self> {
        let code = if currency_code.trim().is_empty() {
            locale.default_currency().unwrap_or("XXX")
        } else {
            currency_code.trim()
        };
        let (symbol, digits) = currency_info(code)?;
        Ok(Self {
            style: Style::Currency { symbol },
            min_fraction_digits: digits,
            max_fraction_digits: digits,
            ..Self::for_locale(locale)
        })
    }

    pub fn numeric(locale: &Locale, options: &NumericOptions) -> Self {
        let mut format = Self::for_locale(locale);
        if let Some(max) = options.max_fraction_digits {
            format.max_fraction_digits = max;
            format.min_fraction_digits = format.min_fraction_digits.min(max);
        }
        if let Some(min) = options.min_fraction_digits {
            format.min_fraction_digits = min;
            format.max_fraction_digits = format.max_fraction_digits.max(min);
        }
        if let Some(max) = options.max_integer_digits {
            format.max_integer_digits = Some(max);
            format.min_integer_digits = format.min_integer_digits.min(max);
        }
        if let Some(min) = options.min_integer_digits {
            format.min_integer_digits = min;
        }
        format.grouping = options.grouping_used;
        format.rounding = options.rounding_mode;
        format
    }

    pub fn format(&self, number: Number) -> String {
        if let Number::Float(f) = number {
            if !f.is_finite() {
                return non_finite(f);
            }
        }

        let value = match (number.to_decimal(), &self.style) {
            (Some(d), Style::Percent) => d.checked_mul(Decimal::ONE_HUNDRED),
            (decimal, _) => decimal,
        };
        let Some(value) = value else {
            return self.format_float(number.to_f64());
        };

        let rounded = value.round_dp_with_strategy(self.max_fraction_digits, strategy(self.rounding));
        let negative = rounded.is_sign_negative() && !rounded.is_zero();
        let digits = self.digits(&rounded.abs().normalize().to_string());
        self.decorate(digits, negative)
    }

    /// Values beyond the decimal range; rounding follows `f64` display
    fn format_float(&self, value: f64) -> String {
        let value = match self.style {
            Style::Percent => value * 100.0,
            _ => value,
        };
        if !value.is_finite() {
            return non_finite(value);
        }

        let plain = format!("{:.*}", self.max_fraction_digits as usize, value.abs());
        let negative = value < 0.0 && plain.chars().any(|c| matches!(c, '1'..='9'));
        let digits = self.digits(&plain);
        self.decorate(digits, negative)
    }

    fn digits(&self, plain: &str) -> String {
        let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain, ""));

        let mut int_digits: String = int_part.trim_start_matches('0').to_string();
        if let Some(max) = self.max_integer_digits {
            let max = max as usize;
            if int_digits.len() > max {
                int_digits = int_digits[int_digits.len() - max..].to_string();
            }
        }
        while int_digits.len() < self.min_integer_digits as usize {
            int_digits.insert(0, '0');
        }

        let mut frac_digits: String = frac_part.trim_end_matches('0').to_string();
        while frac_digits.len() < self.min_fraction_digits as usize {
            frac_digits.push('0');
        }

        let mut out = if self.grouping {
            group(&int_digits, self.symbols.grouping)
        } else {
            int_digits
        };
        if !frac_digits.is_empty() {
            out.push(self.symbols.decimal);
            out.push_str(&frac_digits);
        }
        out
    }

    fn decorate(&self, digits: String, negative: bool) -> String {
        let sign = if negative { "-" } else { "" };
        let nbsp = Locale::nbsp();
        match &self.style {
            Style::Decimal => format!("{sign}{digits}"),
            Style::Percent => match self.symbols.percent {
                Affix::Suffix => format!("{sign}{digits}{nbsp}%"),
                Affix::SuffixTight | Affix::Prefix => format!("{sign}{digits}%"),
            },
            Style::Currency { symbol } => match self.symbols.currency {
                Affix::Prefix if symbol.chars().all(|c| c.is_ascii_alphabetic()) => {
                    format!("{sign}{symbol}{nbsp}{digits}")
                }
                Affix::Prefix => format!("{sign}{symbol}{digits}"),
                Affix::Suffix | Affix::SuffixTight => format!("{sign}{digits}{nbsp}{symbol}"),
            },
        }
    }
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_sign_negative() {
        "-∞".to_string()
    } else {
        "∞".to_string()
    }
}

fn strategy(mode: RoundingMode) -> RoundingStrategy {
    match mode {
        RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
        RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
        RoundingMode::HalfDown => RoundingStrategy::MidpointTowardZero,
        RoundingMode::Up => RoundingStrategy::AwayFromZero,
        RoundingMode::Down => RoundingStrategy::ToZero,
        RoundingMode::Ceiling => RoundingStrategy::ToPositiveInfinity,
        RoundingMode::Floor => RoundingStrategy::ToNegativeInfinity,
    }
}

fn group(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}
