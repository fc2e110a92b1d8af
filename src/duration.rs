//! Duration text in the `1h30m`, `1.5s`, `300ms` style.
//!
//! Parsing accepts a sequence of decimal numbers, each with an optional
//! fraction and a unit suffix (`ns`, `us`, `µs`, `μs`, `ms`, `s`, `m`, `h`).
//! Formatting produces the canonical form: `0s`, `1s`, `1m0s`, `1h0m0s`,
//! `300ms`, `1.5µs`.

use std::time::Duration;

use crate::value::FlagValue;

const UNITS: &[(&str, u128)] = &[
    ("ns", 1),
    ("us", 1_000),
    ("\u{b5}s", 1_000),
    ("\u{3bc}s", 1_000),
    ("ms", 1_000_000),
    ("s", 1_000_000_000),
    ("m", 60_000_000_000),
    ("h", 3_600_000_000_000),
];

// Fraction digits beyond this cannot change a nanosecond count.
const MAX_FRACTION_DIGITS: u32 = 18;

pub fn parse(text: &str) -> Result<Duration, String> {
    let invalid = || format!("invalid duration '{text}'");

    let (negative, mut rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after_int) = rest.split_at(int_len);

        let (frac_digits, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = after_number
            .find(|c: char| c == '.' || c.is_ascii_digit())
            .unwrap_or(after_number.len());
        let (unit, next) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(format!("missing unit in duration '{text}'"));
        }
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| format!("unknown unit '{unit}' in duration '{text}'"))?;

        let whole = digits_value(int_digits).ok_or_else(invalid)?;
        let mut amount = whole.checked_mul(scale).ok_or_else(invalid)?;
        if !frac_digits.is_empty() {
            let kept = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS as usize)];
            let frac = digits_value(kept).ok_or_else(invalid)?;
            let divisor = 10u128.pow(kept.len() as u32);
            amount = amount
                .checked_add(frac * scale / divisor)
                .ok_or_else(invalid)?;
        }
        total = total.checked_add(amount).ok_or_else(invalid)?;
        rest = next;
    }

    if negative && total > 0 {
        return Err(format!("negative duration '{text}' is not supported"));
    }

    u64::try_from(total)
        .map(Duration::from_nanos)
        .map_err(|_| invalid())
}

fn digits_value(digits: &str) -> Option<u128> {
    digits.bytes().try_fold(0u128, |acc, digit| {
        acc.checked_mul(10)?.checked_add(u128::from(digit - b'0'))
    })
}

pub fn format(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < 1_000 {
        return format!("{nanos}ns");
    }
    if nanos < 1_000_000 {
        let (whole, frac) = split_fraction(nanos, 3);
        return format!("{whole}{frac}\u{b5}s");
    }
    if nanos < 1_000_000_000 {
        let (whole, frac) = split_fraction(nanos, 6);
        return format!("{whole}{frac}ms");
    }

    let (seconds, frac) = split_fraction(nanos, 9);
    let minutes = seconds / 60;
    let mut out = String::new();
    if minutes > 0 {
        let hours = minutes / 60;
        if hours > 0 {
            out.push_str(&format!("{hours}h"));
        }
        out.push_str(&format!("{}m", minutes % 60));
    }
    out.push_str(&format!("{}{frac}s", seconds % 60));
    out
}

/// Split `value` into `value / 10^precision` and a `.ddd` suffix with trailing
/// zeros removed (empty when there is no remainder).
fn split_fraction(value: u128, precision: u32) -> (u128, String) {
    let scale = 10u128.pow(precision);
    let remainder = value % scale;
    if remainder == 0 {
        return (value / scale, String::new());
    }
    let digits = format!("{remainder:0width$}", width = precision as usize);
    (value / scale, format!(".{}", digits.trim_end_matches('0')))
}

impl FlagValue for Duration {
    const TYPE_NAME: &'static str = "duration";

    fn parse(text: &str) -> Result<Self, String> {
        parse(text)
    }

    fn format(&self) -> String {
        format(*self)
    }
}
