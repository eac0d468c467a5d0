//! Lenient Value Extraction
//!
//! Converts text read from documents into typed values without ever failing:
//! unparsable input yields the caller's default. Grouping commas are ignored,
//! a leading `+` is dropped, and a trailing magnitude suffix scales the value:
//! `k`/`t` (thousand), `m` (million), `b`/`g` (billion).

use memchr::memchr;
use std::borrow::Cow;

const THOUSAND: i64 = 1_000;
const MILLION: i64 = 1_000_000;
const BILLION: i64 = 1_000_000_000;

/// Strip grouping commas, surrounding whitespace and a leading `+`
fn normalize(text: &str) -> Cow<'_, str> {
    let text = if memchr(b',', text.as_bytes()).is_some() {
        Cow::Owned(text.replace(',', ""))
    } else {
        Cow::Borrowed(text)
    };
    match text {
        Cow::Borrowed(s) => {
            let s = s.trim();
            Cow::Borrowed(s.strip_prefix('+').map_or(s, str::trim))
        }
        Cow::Owned(s) => {
            let trimmed = s.trim();
            Cow::Owned(trimmed.strip_prefix('+').map_or(trimmed, str::trim).to_string())
        }
    }
}

/// Split a trailing magnitude suffix off `text`
fn split_multiplier(text: &str) -> (&str, i64) {
    let multiplier = match text.chars().last() {
        Some('b' | 'B' | 'g' | 'G') => BILLION,
        Some('m' | 'M') => MILLION,
        Some('t' | 'T' | 'k' | 'K') => THOUSAND,
        _ => return (text, 1),
    };
    (text[..text.len() - 1].trim(), multiplier)
}

/// `true`, `yes`, `on` (any case) or `1`; anything else is `false`
pub fn extract_boolean(text: &str) -> bool {
    let text = normalize(text);
    let text = text.as_ref();
    text.eq_ignore_ascii_case("true")
        || text.eq_ignore_ascii_case("yes")
        || text.eq_ignore_ascii_case("on")
        || text == "1"
}

/// Integer value of `text`, clamped to the `i32` range, or `default`
pub fn extract_integer(text: &str, default: i32) -> i32 {
    let normalized = normalize(text);
    if normalized.contains('.') {
        return extract_double(&normalized, default as f64) as i32;
    }
    let (digits, multiplier) = split_multiplier(&normalized);
    match digits.parse::<i64>() {
        Ok(value) => {
            let max = i32::MAX as i64 / multiplier;
            let min = i32::MIN as i64 / multiplier;
            (value.clamp(min, max) * multiplier) as i32
        }
        Err(_) => default,
    }
}

/// Integer value of `text`, clamped to the `i64` range, or `default`
pub fn extract_long(text: &str, default: i64) -> i64 {
    let normalized = normalize(text);
    if normalized.contains('.') {
        return extract_double(&normalized, default as f64) as i64;
    }
    let (digits, multiplier) = split_multiplier(&normalized);
    match digits.parse::<i128>() {
        Ok(value) => {
            let max = (i64::MAX / multiplier) as i128;
            let min = (i64::MIN / multiplier) as i128;
            value.clamp(min, max) as i64 * multiplier
        }
        Err(_) => default,
    }
}

/// Floating point value of `text`, clamped to finite range, or `default`
pub fn extract_double(text: &str, default: f64) -> f64 {
    let normalized = normalize(text);
    let (digits, multiplier) = split_multiplier(&normalized);
    let multiplier = multiplier as f64;
    match fast_float2::parse::<f64, _>(digits) {
        Ok(value) => {
            let max = f64::MAX / multiplier;
            value.clamp(-max, max) * multiplier
        }
        Err(_) => default,
    }
}
