//! Declarative formatting metadata attached to bean fields

use serde::{Deserialize, Serialize};

/// Rounding applied when a number has more fraction digits than allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    #[default]
    HalfEven,
    HalfUp,
    HalfDown,
    Up,
    Down,
    Ceiling,
    Floor,
}

/// Options of a generic numeric directive
///
/// Unset limits keep the locale defaults (up to three fraction digits, grouping on).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumericOptions {
    pub max_fraction_digits: Option<u32>,
    pub min_fraction_digits: Option<u32>,
    pub max_integer_digits: Option<u32>,
    pub min_integer_digits: Option<u32>,
    pub grouping_used: bool,
    pub rounding_mode: RoundingMode,
}

impl Default for NumericOptions {
    fn default() -> Self {
        Self {
            max_fraction_digits: None,
            min_fraction_digits: None,
            max_integer_digits: None,
            min_integer_digits: None,
            grouping_used: true,
            rounding_mode: RoundingMode::HalfEven,
        }
    }
}

/// Format directive declared on a field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatDirective {
    Percentage {
        #[serde(default)]
        max_fraction_digits: Option<u32>,
    },
    Money {
        /// Blank means the currency of the generation locale
        #[serde(default)]
        currency_code: String,
    },
    Numeric(NumericOptions),
    DateTime { pattern: String },
    Image {
        #[serde(default)]
        max_width: Option<u32>,
    },
}

/// Precedence between the number directive kinds when a field declares several
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum NumberDirectiveRank {
    Percentage,
    Money,
    Numeric,
}

impl FormatDirective {
    pub fn percentage() -> Self {
        FormatDirective::Percentage {
            max_fraction_digits: None,
        }
    }

    pub fn money(currency_code: impl Into<String>) -> Self {
        FormatDirective::Money {
            currency_code: currency_code.into(),
        }
    }

    pub fn numeric(options: NumericOptions) -> Self {
        FormatDirective::Numeric(options)
    }

    pub fn date_time(pattern: impl Into<String>) -> Self {
        FormatDirective::DateTime { pattern: pattern.into() }
    }

    pub fn image(max_width: Option<u32>) -> Self {
        FormatDirective::Image { max_width }
    }

    pub(crate) fn number_rank(&self) -> Option<NumberDirectiveRank> {
        match self {
            FormatDirective::Percentage { .. } => Some(NumberDirectiveRank::Percentage),
            FormatDirective::Money { .. } => Some(NumberDirectiveRank::Money),
            FormatDirective::Numeric(_) => Some(NumberDirectiveRank::Numeric),
            _ => None,
        }
    }
}
