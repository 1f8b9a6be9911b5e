use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

const RUPIAH_PREFIX: &str = "Rp ";

/// Grouping preferences for rendering and reading amounts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub grouping_separator: char,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            grouping_separator: '.',
        }
    }
}

impl LocaleConfig {
    pub fn with_grouping(mut self, separator: char) -> Self {
        self.grouping_separator = separator;
        self
    }

    /// Separator for fractional digits: `,` when digits are grouped with `.`.
    pub fn decimal_separator(&self) -> char {
        if self.grouping_separator == '.' {
            ','
        } else {
            '.'
        }
    }
}

/// Rounds to whole units, half-to-even.
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

/// Integer-grouped rendering without any currency prefix.
pub fn format_number(locale: &LocaleConfig, value: Decimal) -> String {
    let rounded = round_whole(value);
    let digits = rounded.abs().trunc().to_string();
    let grouped = group_digits(&digits, locale.grouping_separator);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

/// `Rp 1.250.000`.
pub fn format_rupiah(amount: Decimal, locale: &LocaleConfig) -> String {
    format!("{}{}", RUPIAH_PREFIX, format_number(locale, amount))
}

/// Reads an amount written the way it is displayed: an optional `Rp` prefix,
/// grouping separators and `_` are ignored, and the locale's decimal separator
/// marks fractional digits. `100.000` is one hundred thousand under `.` grouping.
pub fn parse_amount(input: &str, locale: &LocaleConfig) -> Option<Decimal> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix(RUPIAH_PREFIX.trim_end())
        .unwrap_or(trimmed)
        .trim_start();
    if body.is_empty() {
        return None;
    }
    let normalized: String = body
        .chars()
        .filter(|ch| *ch != '_' && *ch != locale.grouping_separator)
        .map(|ch| if ch == locale.decimal_separator() { '.' } else { ch })
        .collect();
    Decimal::from_str(&normalized).ok()
}

/// `02 December 2024`.
pub fn format_date(date: NaiveDate) -> String {
    format!(
        "{:02} {} {}",
        date.day(),
        month_label(date.month()),
        date.year()
    )
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}
