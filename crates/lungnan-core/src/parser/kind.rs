//! Income / expense classification for a single fragment

use crate::models::TransactionKind;

/// Words that mark a fragment as income
pub const INCOME_KEYWORDS: &[&str] = &[
    "รายรับ",
    "รับ",
    "ได้เงิน",
    "เงินเข้า",
    "ขายได้",
    "โบนัส",
    "เงินเดือน",
    "income",
    "salary",
    "payroll",
    "wage",
    "receive",
    "bonus",
    "sold",
    "earned",
    "refund",
];

/// Words that mark a fragment as an expense
pub const EXPENSE_KEYWORDS: &[&str] = &[
    "รายจ่าย",
    "จ่าย",
    "ซื้อ",
    "โอน",
    "ค่า",
    "ผ่อน",
    "เติม",
    "expense",
    "paid",
    "payment",
    "bought",
    "buy",
    "spent",
    "spend",
    "transfer",
    "bill",
    "top up",
    "installment",
];

/// Local evidence for a fragment's kind, without any fallback
///
/// An explicit `+` / `-` prefix wins over keywords. When both keyword sets
/// match, the fragment is ambiguous and `None` is returned.
pub fn type_hint(fragment: &str) -> Option<TransactionKind> {
    let trimmed = fragment.trim();
    if trimmed.starts_with('+') {
        return Some(TransactionKind::Income);
    }
    if trimmed.starts_with('-') {
        return Some(TransactionKind::Expense);
    }

    let lowered = trimmed.to_lowercase();
    let has_income = INCOME_KEYWORDS.iter().any(|k| lowered.contains(k));
    let has_expense = EXPENSE_KEYWORDS.iter().any(|k| lowered.contains(k));

    match (has_income, has_expense) {
        (true, false) => Some(TransactionKind::Income),
        (false, true) => Some(TransactionKind::Expense),
        _ => None,
    }
}

/// Classify a fragment, falling back to `fallback` and then to expense
pub fn classify(fragment: &str, fallback: Option<TransactionKind>) -> TransactionKind {
    type_hint(fragment)
        .or(fallback)
        .unwrap_or(TransactionKind::Expense)
}
