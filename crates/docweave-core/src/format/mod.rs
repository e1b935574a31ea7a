//! Format directive lookup
//!
//! Turns the directives a bean declares on a field into a formatter. A field
//! without a directive is not an error: it is formatted with the locale
//! defaults.
//!
//! Number directives are ranked percentage > money > numeric. The rank only
//! matters for beans that declare more than one number directive on a field.

pub mod directive;
pub mod number;
pub mod temporal;

pub use directive::{FormatDirective, NumericOptions, RoundingMode};
pub use number::{Number, NumberFormatter};
pub use temporal::{DateTimeFormatter, Temporal};

use crate::error::Result;
use crate::locale::Locale;

/// Select the number formatter for a field
pub fn find_number_format(
    directives: &[FormatDirective],
    field: &str,
    locale: &Locale,
) -> Result<NumberFormatter> {
    let selected = directives
        .iter()
        .filter_map(|d| d.number_rank().map(|rank| (rank, d)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, d)| d);

    match selected {
        Some(FormatDirective::Percentage {
            max_fraction_digits,
        }) => Ok(NumberFormatter::percent(locale, *max_fraction_digits)),
        Some(FormatDirective::Money { currency_code }) => {
            NumberFormatter::currency(locale, currency_code)
        }
        Some(FormatDirective::Numeric(options)) => Ok(NumberFormatter::numeric(locale, options)),
        _ => {
            tracing::debug!(
                "Did not find formatting directive for {}, formatting according to locale {}",
                field,
                locale
            );
            Ok(NumberFormatter::for_locale(locale))
        }
    }
}

/// Select the date/time formatter for a field
pub fn find_temporal_format(
    directives: &[FormatDirective],
    field: &str,
    locale: &Locale,
    value: &Temporal,
) -> Result<DateTimeFormatter> {
    let declared = directives.iter().find_map(|d| match d {
        FormatDirective::DateTime { pattern } => Some(pattern),
        _ => None,
    });

    match declared {
        Some(pattern) => DateTimeFormatter::of_pattern(pattern),
        None => {
            tracing::debug!(
                "Did not find date format for {}, using short style of {}",
                field,
                locale
            );
            Ok(DateTimeFormatter::short_for(locale, value))
        }
    }
}

/// The `max_width` of an image directive, if the field declares one
pub fn find_image_directive(directives: &[FormatDirective]) -> Option<Option<u32>> {
    directives.iter().find_map(|d| match d {
        FormatDirective::Image { max_width } => Some(*max_width),
        _ => None,
    })
}
