//! Splitting a chat message into transaction fragments

use once_cell::sync::Lazy;
use regex::Regex;

/// Longest note kept on a transaction, in characters
pub const MAX_NOTE_CHARS: usize = 120;

/// Conjunctions that join two entries in one line
static CONJUNCTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i) +(?:and|with|และ|กับ) +").expect("valid regex"));

/// Split a message into ordered, non-empty fragments
///
/// Separators are newlines, semicolons, commas (full-width commas included)
/// and the conjunctions "and" / "with" / "และ" / "กับ" between spaces. A comma
/// sitting between two digits is a thousands separator and does not split, so
/// splitting is deliberately not purely syntactic: "25,000" stays one amount.
pub fn split_entries(text: &str) -> Vec<String> {
    let normalized = text.replace('，', ",");

    split_on_punctuation(&normalized)
        .iter()
        .flat_map(|line| CONJUNCTION_PATTERN.split(line))
        .map(strip_decoration)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_on_punctuation(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut parts = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        let is_separator = match c {
            '\n' | ';' => true,
            ',' => {
                let digit_before = i > 0 && chars[i - 1].is_ascii_digit();
                let digit_after = chars.get(i + 1).is_some_and(|n| n.is_ascii_digit());
                !(digit_before && digit_after)
            }
            _ => false,
        };

        if is_separator {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    parts.push(current);

    parts
}

/// Remove list bullets, dashes and whitespace around a fragment
///
/// A dash directly followed by a digit is an expense sign, not a bullet.
fn strip_decoration(fragment: &str) -> &str {
    let mut rest = fragment;
    loop {
        rest = rest.trim_start();
        let mut chars = rest.chars();
        match chars.next() {
            Some('•') | Some('*') => rest = chars.as_str(),
            Some('-') if !chars.clone().next().is_some_and(|n| n.is_ascii_digit()) => {
                rest = chars.as_str()
            }
            _ => break,
        }
    }
    rest.trim_end_matches(|c: char| c.is_whitespace() || c == '-' || c == '•')
}

/// Collapse whitespace and cap the note length
pub fn clean_note(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(MAX_NOTE_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_separated() {
        assert_eq!(
            split_entries("rice 50, coffee 45, travel 30"),
            vec!["rice 50", "coffee 45", "travel 30"]
        );
    }

    #[test]
    fn test_no_separator_is_single_fragment() {
        assert_eq!(split_entries("salary 25000"), vec!["salary 25000"]);
    }

    #[test]
    fn test_newlines_semicolons_and_full_width_comma() {
        assert_eq!(
            split_entries("rice 50\ncoffee 45;snack 20，water 10"),
            vec!["rice 50", "coffee 45", "snack 20", "water 10"]
        );
    }

    #[test]
    fn test_conjunctions() {
        assert_eq!(
            split_entries("rice 50 and coffee 45 with taxi 80"),
            vec!["rice 50", "coffee 45", "taxi 80"]
        );
        assert_eq!(split_entries("ข้าว 50 และ กาแฟ 45"), vec!["ข้าว 50", "กาแฟ 45"]);
        assert_eq!(split_entries("sandwich 60"), vec!["sandwich 60"]);
    }

    #[test]
    fn test_thousands_separator_kept() {
        assert_eq!(split_entries("salary 25,000"), vec!["salary 25,000"]);
        assert_eq!(split_entries("rent 8,000, water 150"), vec!["rent 8,000", "water 150"]);
    }

    #[test]
    fn test_bullets_stripped_and_empty_dropped() {
        assert_eq!(
            split_entries("• rice 50\n\n - coffee 45 -\n,,"),
            vec!["rice 50", "coffee 45"]
        );
    }

    #[test]
    fn test_sign_dash_preserved() {
        assert_eq!(split_entries("-120 taxi\n+500 tips"), vec!["-120 taxi", "+500 tips"]);
    }

    #[test]
    fn test_clean_note_collapses_whitespace() {
        assert_eq!(clean_note("  rice \t 50   baht "), "rice 50 baht");
    }

    #[test]
    fn test_clean_note_truncates_by_characters() {
        let long = "ก".repeat(200);
        let note = clean_note(&long);
        assert_eq!(note.chars().count(), MAX_NOTE_CHARS);
    }
}
