//! Display helpers for statement lines.
//!
//! Everything here is pure: the same transaction always renders the same way. Inputs are
//! optional because the backend payload is only loosely validated (see `ledgerlens-ingest`).

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::fmt::{self, Write};

use crate::statement::Transaction;

pub const UNKNOWN_COUNTERPARTY: &str = "Unknown";
pub const MISSING_DATE: &str = "N/A";
pub const INVALID_DATE: &str = "Invalid Date";

/// Currency glyph used for transaction amounts
pub const CURRENCY_SYMBOL: char = '€';

/// en-US style "Jan 15, 2024, 09:05 AM"
const DATE_DISPLAY_FORMAT: &str = "%b %-d, %Y, %I:%M %p";

/// Naive date-times are read in the display timezone.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Styling hint for a transaction tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Danger,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Danger => "danger",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

/// Incoming (credit) when `from` is set, whatever `to` says.
pub fn is_credit(tx: Option<&Transaction>) -> bool {
    tx.is_some_and(|t| non_empty(&t.from).is_some())
}

/// `from`, then `to`, then "Unknown".
pub fn counterparty(tx: Option<&Transaction>) -> String {
    tx.and_then(|t| non_empty(&t.from).or_else(|| non_empty(&t.to)))
        .unwrap_or(UNKNOWN_COUNTERPARTY)
        .to_string()
}

pub fn severity(is_credit: bool) -> Severity {
    if is_credit {
        Severity::Success
    } else {
        Severity::Danger
    }
}

/// Signed amount with the currency glyph, e.g. `+€1,234.50` or `-€0.00` when missing.
///
/// The sign comes from the direction only; the amount itself is rendered as received.
pub fn format_amount(amount: Option<f64>, is_credit: bool) -> String {
    let sign = if is_credit { '+' } else { '-' };
    let formatted = match amount {
        Some(value) => group_decimal(value),
        None => "0.00".to_string(),
    };
    format!("{sign}{CURRENCY_SYMBOL}{formatted}")
}

/// Unsigned balance figure with two decimals, `"0.00"` when missing.
pub fn format_balance(amount: Option<f64>) -> String {
    amount.map(group_decimal).unwrap_or_else(|| "0.00".to_string())
}

/// Two fraction digits with comma thousands separators.
fn group_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = round_to_cents(value.abs());
    let (int_part, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && fixed != "0.00";
    format!("{}{grouped}.{frac}", if negative { "-" } else { "" })
}

/// Round a non-negative finite value to two decimals, ties away from zero.
///
/// Works on the shortest decimal representation of `value`, so `1.005` rounds to `1.01` even
/// though the nearest double is slightly below it.
fn round_to_cents(value: f64) -> String {
    let repr = value.to_string();
    let (int_part, frac) = repr.split_once('.').unwrap_or((repr.as_str(), ""));

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac.bytes().chain(std::iter::repeat(b'0')).take(2))
        .map(|b| b - b'0')
        .collect();

    if frac.as_bytes().get(2).is_some_and(|d| *d >= b'5') {
        let mut carry = true;
        for d in digits.iter_mut().rev() {
            if *d == 9 {
                *d = 0;
            } else {
                *d += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - 2;
    let to_str = |ds: &[u8]| ds.iter().map(|d| char::from(b'0' + d)).collect::<String>();
    format!("{}.{}", to_str(&digits[..split]), to_str(&digits[split..]))
}

/// Format an ISO-8601 timestamp in UTC. See [`format_date_in`].
pub fn format_date(date: Option<&str>) -> String {
    format_date_in(date, Tz::UTC)
}

/// "Jan 15, 2024, 10:30 AM" in `tz`; "N/A" when missing, "Invalid Date" when unparseable.
pub fn format_date_in(date: Option<&str>, tz: Tz) -> String {
    let Some(raw) = date.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING_DATE.to_string();
    };

    let Some(instant) = parse_instant(raw, tz) else {
        return INVALID_DATE.to_string();
    };

    let mut out = String::new();
    match write!(out, "{}", instant.format(DATE_DISPLAY_FORMAT)) {
        Ok(()) => out,
        Err(_) => INVALID_DATE.to_string(),
    }
}

fn parse_instant(raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz));
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return tz.from_local_datetime(&ndt).earliest();
        }
    }

    // Bare dates are midnight UTC
    let day = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    Some(day.and_hms_opt(0, 0, 0)?.and_utc().with_timezone(&tz))
}
