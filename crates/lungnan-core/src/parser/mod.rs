//! Free-text transaction extraction
//!
//! Turns a chat message such as `"rice 50, coffee 45, taxi 80"` or
//! `"+25000 salary"` into structured transactions:
//!
//! 1. Split the message into fragments (`split`)
//! 2. Infer one message-wide kind from the fragments' own hints (`kind`)
//! 3. Per fragment: extract the amount (`amount`), classify the kind, resolve
//!    the category, clean the note
//! 4. If no fragment produced a transaction, retry once on the whole message
//!
//! Everything here is pure; callers pass the rule set they want resolved
//! against, so per-user rules never leak between requests.

mod amount;
mod kind;
mod split;

use tracing::debug;

use crate::categories::CategoryRules;
use crate::models::{ParsedTransaction, TransactionKind};

pub use amount::extract_amount;
pub use kind::{classify, type_hint, EXPENSE_KEYWORDS, INCOME_KEYWORDS};
pub use split::{clean_note, split_entries, MAX_NOTE_CHARS};

/// Kind shared by the whole message, if the message settles on one
///
/// Exactly one distinct hint across fragments wins. Otherwise (none, or
/// conflicting hints) the unsplit text decides, which may also be `None`.
pub fn infer_message_kind(text: &str) -> Option<TransactionKind> {
    let mut hints: Vec<TransactionKind> = Vec::new();
    for fragment in split_entries(text) {
        if let Some(hint) = type_hint(&fragment) {
            if !hints.contains(&hint) {
                hints.push(hint);
            }
        }
    }

    match hints.as_slice() {
        [only] => Some(*only),
        _ => type_hint(text),
    }
}

/// Parse one fragment into a transaction
///
/// Returns `None` when the fragment carries no positive amount.
pub fn parse_single(
    fragment: &str,
    fallback: Option<TransactionKind>,
    rules: &CategoryRules,
) -> Option<ParsedTransaction> {
    let amount = extract_amount(fragment)?;
    let kind = classify(fragment, fallback);
    let category = rules.resolve(fragment, kind);

    Some(ParsedTransaction {
        kind,
        amount,
        category,
        note: clean_note(fragment),
    })
}

/// Parse every transaction in a message
///
/// `rules` defaults to the built-in categories. Fragments without an amount
/// are skipped silently.
pub fn parse_transactions(text: &str, rules: Option<&CategoryRules>) -> Vec<ParsedTransaction> {
    let rules = match rules {
        Some(rules) => rules,
        None => CategoryRules::builtin(),
    };

    let fragments = split_entries(text);
    if fragments.is_empty() {
        return Vec::new();
    }

    let message_kind = infer_message_kind(text);
    let parsed: Vec<ParsedTransaction> = fragments
        .iter()
        .filter_map(|fragment| {
            let fallback = match type_hint(fragment) {
                Some(_) => None,
                None => message_kind,
            };
            parse_single(fragment, fallback, rules)
        })
        .collect();

    debug!(
        fragments = fragments.len(),
        parsed = parsed.len(),
        message_kind = ?message_kind,
        "Parsed message fragments"
    );

    if !parsed.is_empty() {
        return parsed;
    }

    // Nothing survived splitting; treat the unsplit message as one entry
    parse_single(text, None, rules).into_iter().collect()
}

/// First transaction in a message, if any
pub fn parse_transaction(text: &str, rules: Option<&CategoryRules>) -> Option<ParsedTransaction> {
    parse_transactions(text, rules).into_iter().next()
}
