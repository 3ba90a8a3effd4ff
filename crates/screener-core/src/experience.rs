//! Years-of-experience inference from free text.
//!
//! Two passes:
//! 1. [`normalize_number_words`] rewrites spelled-out numbers as digits
//!    (`"twenty three years"` → `"23 years"`).
//! 2. A tolerant pattern picks up every `<figure> year(s)` phrase and the
//!    largest figure wins.
//!
//! Hedging words ("less than", "over", ...) are recognised but never adjust
//! the figure: "less than 5 years" counts as 5.

use once_cell::sync::Lazy;
use regex::Regex;

/// Largest number of words tried as one spelled-out number.
pub const NUMBER_WINDOW: usize = 3;

static EXPERIENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?x)
        (?:(?:about|around|approximately|nearly|almost|more\s+than|over|at\s+least|less\s+than)\s+)?
        (?:(?:worked\s+for|possess(?:ed)?|gained|have|has|with)\s+)?
        (\d+(?:\.\d+)?)\s*\+?\s*
        (?:years?|yrs?)
        (?:\s+of\s+(?:experience|expertise|exposure|background|practice|career))?
        ",
    )
    .unwrap()
});

fn small_value(word: &str) -> Option<u64> {
    let value = match word {
        "zero" => 0,
        "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        "thirteen" => 13,
        "fourteen" => 14,
        "fifteen" => 15,
        "sixteen" => 16,
        "seventeen" => 17,
        "eighteen" => 18,
        "nineteen" => 19,
        "twenty" => 20,
        "thirty" => 30,
        "forty" => 40,
        "fifty" => 50,
        "sixty" => 60,
        "seventy" => 70,
        "eighty" => 80,
        "ninety" => 90,
        _ => return None,
    };
    Some(value)
}

fn scale_value(word: &str) -> Option<u64> {
    match word {
        "hundred" => Some(100),
        "thousand" => Some(1_000),
        "million" => Some(1_000_000),
        "billion" => Some(1_000_000_000),
        _ => None,
    }
}

fn is_number_part(part: &str) -> bool {
    part == "point" || small_value(part).is_some() || scale_value(part).is_some()
}

fn strip_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

/// Split a whitespace token into number-word parts (`"twenty-five,"` →
/// `["twenty", "five"]`), or `None` if any part is not a number word.
fn number_parts(word: &str) -> Option<Vec<String>> {
    let cleaned = strip_punctuation(word).to_lowercase();
    if cleaned.is_empty() {
        return None;
    }
    let parts: Vec<String> = cleaned.split('-').map(str::to_string).collect();
    if parts.iter().all(|p| is_number_part(p)) {
        Some(parts)
    } else {
        None
    }
}

/// Evaluate a sequence of number words. `None` if the phrase is malformed
/// (e.g. `"point"` with no digits after it).
fn parse_number_phrase(parts: &[String]) -> Option<f64> {
    let mut total: u64 = 0;
    let mut current: u64 = 0;
    let mut seen_integer = false;

    let mut iter = parts.iter();
    while let Some(part) = iter.next() {
        if part == "point" {
            let digits: Option<String> = iter
                .by_ref()
                .map(|p| match small_value(p) {
                    Some(d) if d < 10 => Some(char::from(b'0' + d as u8)),
                    _ => None,
                })
                .collect();
            let digits = digits.filter(|d| !d.is_empty())?;
            let whole = total.checked_add(current)?;
            return format!("{whole}.{digits}").parse().ok();
        }
        if let Some(value) = small_value(part) {
            current = current.checked_add(value)?;
        } else if part == "hundred" {
            current = current.max(1).checked_mul(100)?;
        } else if let Some(scale) = scale_value(part) {
            total = total.checked_add(current.max(1).checked_mul(scale)?)?;
            current = 0;
        } else {
            return None;
        }
        seen_integer = true;
    }

    let whole = total.checked_add(current)?;
    seen_integer.then_some(whole as f64)
}

fn format_numeral(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{value}")
    }
}

/// Try the leading run of number words in `window`. Returns the numeral and
/// how many words it consumed.
fn parse_window(window: &[&str]) -> Option<(String, usize)> {
    let mut parts = Vec::new();
    let mut consumed = 0;
    for word in window {
        match number_parts(word) {
            Some(p) => {
                parts.extend(p);
                consumed += 1;
            }
            None => break,
        }
    }
    if consumed == 0 {
        return None;
    }
    parse_number_phrase(&parts).map(|v| (format_numeral(v), consumed))
}

/// Interpret one word alone: a number word, or a numeric literal with
/// surrounding punctuation stripped.
fn parse_single(word: &str) -> Option<String> {
    if let Some(parts) = number_parts(word) {
        return parse_number_phrase(&parts).map(format_numeral);
    }
    let cleaned = strip_punctuation(word);
    if !cleaned.is_empty() && cleaned.parse::<f64>().is_ok() {
        return Some(cleaned.to_string());
    }
    None
}

/// Replace spelled-out numbers with digits, scanning left to right.
///
/// At each position a window of up to [`NUMBER_WINDOW`] words is tried; if
/// its leading number words form a valid number they are replaced and
/// skipped. Otherwise the single word is tried, and failing that it is kept
/// as-is. Failed windows are never retried at other sizes.
pub fn normalize_number_words(text: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out: Vec<String> = Vec::with_capacity(words.len());

    let mut i = 0;
    while i < words.len() {
        let end = (i + NUMBER_WINDOW).min(words.len());
        if let Some((numeral, consumed)) = parse_window(&words[i..end]) {
            out.push(numeral);
            i += consumed;
            continue;
        }
        match parse_single(words[i]) {
            Some(numeral) => out.push(numeral),
            None => out.push(words[i].to_string()),
        }
        i += 1;
    }

    out.join(" ")
}

/// Every experience figure mentioned in `text`, in order of appearance.
pub fn experience_mentions(text: &str) -> Vec<f64> {
    let normalized = normalize_number_words(text);
    EXPERIENCE_RE
        .captures_iter(&normalized)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .collect()
}

/// Largest number of years mentioned anywhere in `text`; 0 when none.
pub fn extract_years_experience(text: &str) -> f64 {
    experience_mentions(text).into_iter().fold(0.0, f64::max)
}
