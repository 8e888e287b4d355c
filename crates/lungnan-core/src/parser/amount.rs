//! Amount extraction
//!
//! Only the first number in a fragment counts. Anything after it is treated
//! as noise (dates, reference numbers, quantities).

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits with optional thousands separators and an optional fraction
static AMOUNT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").expect("valid regex"));

/// Extract the first positive amount from a fragment
///
/// Returns `None` when the fragment has no number, the number does not parse,
/// or it is zero. A leading sign is not part of the match, so `-50` yields 50;
/// sign handling belongs to the kind classifier.
pub fn extract_amount(fragment: &str) -> Option<f64> {
    let token = AMOUNT_PATTERN.find(fragment)?.as_str();
    let value: f64 = token.replace(',', "").parse().ok()?;

    if value > 0.0 && value.is_finite() {
        Some(value)
    } else {
        None
    }
}
