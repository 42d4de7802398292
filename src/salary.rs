//! Best-effort INR salary extraction from free-text salary strings.
//!
//! Listings write pay as "₹3,00,000", "3 LPA", "3 lakh - 5 lakh", "Rs. 25000
//! per month" and so on. The parser looks for a rupee cue, pulls every number
//! out of the string and decides per number whether it is counted in lakhs or
//! in rupees. Anything it cannot make sense of is "no parse", never an error.

use regex::Regex;
use std::sync::OnceLock;

const LAKH: f64 = 100_000.0;
/// Characters after a number inspected for a unit.
const UNIT_WINDOW: usize = 20;

const LAKH_CUES: [&str; 3] = ["lakh", "lac", "lpa"];
const RUPEE_CUES: [&str; 3] = ["₹", "rs", "inr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryRange {
    pub min_inr: u64,
    pub max_inr: u64,
}

impl SalaryRange {
    /// True when this range shares at least one rupee with `[min_inr, max_inr]`.
    pub fn overlaps(&self, min_inr: u64, max_inr: u64) -> bool {
        self.max_inr >= min_inr && self.min_inr <= max_inr
    }
}

fn number_regex() -> &'static Regex {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER.get_or_init(|| Regex::new(r"\d+(?:\.\d+)?").unwrap())
}

/// Parses a salary string into an INR range.
///
/// Every number in the string contributes, so "3 years exp, 5 lakh" yields a
/// range starting at the "3". Callers relying on the current matching
/// behavior depend on this.
pub fn parse_salary(text: &str) -> Option<SalaryRange> {
    let normalized = normalize(text);
    if !has_any(&normalized, &LAKH_CUES) && !has_any(&normalized, &RUPEE_CUES) {
        return None;
    }
    let lakh_anywhere = has_any(&normalized, &LAKH_CUES);

    let mut values = Vec::new();
    for m in number_regex().find_iter(&normalized) {
        let Ok(value) = m.as_str().parse::<f64>() else {
            continue;
        };
        let window: String = normalized[m.end()..].chars().take(UNIT_WINDOW).collect();

        let rupees = if has_any(&window, &LAKH_CUES) {
            value * LAKH
        } else if has_any(&window, &RUPEE_CUES) {
            value
        } else if value < 100.0 && lakh_anywhere {
            value * LAKH
        } else {
            value
        };
        values.push(rupees.round() as u64);
    }

    let min_inr = *values.iter().min()?;
    let max_inr = *values.iter().max()?;
    Some(SalaryRange { min_inr, max_inr })
}

/// Lowercases, folds plural lakh spellings and drops digit-group commas.
fn normalize(text: &str) -> String {
    let lowered = text
        .to_lowercase()
        .replace("lakhs", "lakh")
        .replace("lacs", "lakh");

    let chars: Vec<char> = lowered.chars().collect();
    let mut out = String::with_capacity(lowered.len());
    for (i, c) in chars.iter().enumerate() {
        if *c == ',' {
            let prev_digit = i > 0 && chars[i - 1].is_ascii_digit();
            let next_digit = chars.get(i + 1).map_or(false, |n| n.is_ascii_digit());
            if prev_digit && next_digit {
                continue;
            }
        }
        out.push(*c);
    }
    out
}

fn has_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}
