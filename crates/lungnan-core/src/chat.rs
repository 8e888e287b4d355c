//! Chat command grammar
//!
//! Every incoming text is either one of a handful of fixed commands, a custom
//! category command, or free text that goes to the transaction parser.
//! Commands are matched case-insensitively after trimming, in English or Thai.

use crate::categories::{normalize_category_name, parse_keyword_list};

const SUMMARY_TODAY: &[&str] = &["summary", "summary today", "today", "สรุป", "สรุปวันนี้"];
const SUMMARY_MONTH: &[&str] = &["summary month", "month", "สรุปเดือนนี้", "เดือนนี้"];
const HEALTH: &[&str] = &[
    "financial health",
    "health",
    "สุขภาพการเงิน",
    "สุขภาพการเงินของฉัน",
];
const HELP: &[&str] = &["help", "วิธีใช้"];
const LIST_CATEGORIES: &[&str] = &["categories", "หมวดหมู่"];

// Longer Thai forms first so "เพิ่มหมวดหมู่" is not read as "เพิ่มหมวด" + "หมู่"
const ADD_PREFIXES: &[&str] = &["add category", "เพิ่มหมวดหมู่", "เพิ่มหมวด"];
const DELETE_PREFIXES: &[&str] = &["delete category", "ลบหมวดหมู่", "ลบหมวด"];

/// Which category command was malformed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryUsage {
    Add,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    SummaryToday,
    SummaryMonth,
    Health,
    Help,
    ListCategories,
    AddCategory { name: String, keywords: Vec<String> },
    DeleteCategory { name: String },
    /// A category command with missing or malformed arguments
    InvalidCategoryCommand(CategoryUsage),
    /// Free text to record as transactions
    Record(String),
}

impl ChatCommand {
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let normalized = text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let is = |words: &[&str]| words.contains(&normalized.as_str());

        if is(SUMMARY_TODAY) {
            return Self::SummaryToday;
        }
        if is(SUMMARY_MONTH) {
            return Self::SummaryMonth;
        }
        if is(HEALTH) {
            return Self::Health;
        }
        if is(HELP) {
            return Self::Help;
        }
        if is(LIST_CATEGORIES) {
            return Self::ListCategories;
        }

        if let Some(rest) = strip_command(text, ADD_PREFIXES) {
            return parse_add(rest);
        }
        if let Some(rest) = strip_command(text, DELETE_PREFIXES) {
            return match normalize_category_name(rest) {
                Ok(name) => Self::DeleteCategory { name },
                Err(_) => Self::InvalidCategoryCommand(CategoryUsage::Delete),
            };
        }

        Self::Record(text.to_string())
    }
}

/// `<name>: kw1, kw2` or `<name> = kw1, kw2`
fn parse_add(rest: &str) -> ChatCommand {
    let invalid = ChatCommand::InvalidCategoryCommand(CategoryUsage::Add);

    let Some(split_at) = rest.find([':', '=']) else {
        return invalid;
    };
    let (name, keywords) = (&rest[..split_at], &rest[split_at + 1..]);

    let Ok(name) = normalize_category_name(name) else {
        return invalid;
    };
    let keywords = parse_keyword_list(keywords);
    if keywords.is_empty() {
        return invalid;
    }

    ChatCommand::AddCategory { name, keywords }
}

/// Strip the first matching command prefix, returning the trimmed arguments
///
/// English prefixes must end at a word boundary; Thai is written without
/// spaces so its prefixes may run straight into the name.
fn strip_command<'a>(text: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    for prefix in prefixes {
        let Some(head) = text.get(..prefix.len()) else {
            continue;
        };
        if !head.eq_ignore_ascii_case(prefix) {
            continue;
        }
        let rest = &text[prefix.len()..];
        if prefix.is_ascii() && !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
            continue;
        }
        return Some(rest.trim());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_commands() {
        assert_eq!(ChatCommand::parse("summary"), ChatCommand::SummaryToday);
        assert_eq!(ChatCommand::parse("  Summary   Today "), ChatCommand::SummaryToday);
        assert_eq!(ChatCommand::parse("สรุปวันนี้"), ChatCommand::SummaryToday);
        assert_eq!(ChatCommand::parse("SUMMARY MONTH"), ChatCommand::SummaryMonth);
        assert_eq!(ChatCommand::parse("สรุปเดือนนี้"), ChatCommand::SummaryMonth);
        assert_eq!(ChatCommand::parse("financial health"), ChatCommand::Health);
        assert_eq!(ChatCommand::parse("สุขภาพการเงินของฉัน"), ChatCommand::Health);
        assert_eq!(ChatCommand::parse("help"), ChatCommand::Help);
        assert_eq!(ChatCommand::parse("หมวดหมู่"), ChatCommand::ListCategories);
    }

    #[test]
    fn test_add_category() {
        assert_eq!(
            ChatCommand::parse("add category Pets: vet, Cat Food, vet"),
            ChatCommand::AddCategory {
                name: "pets".to_string(),
                keywords: vec!["vet".to_string(), "cat food".to_string()],
            }
        );
        assert_eq!(
            ChatCommand::parse("Add Category kids = toy"),
            ChatCommand::AddCategory {
                name: "kids".to_string(),
                keywords: vec!["toy".to_string()],
            }
        );
    }

    #[test]
    fn test_add_category_thai() {
        assert_eq!(
            ChatCommand::parse("เพิ่มหมวดสัตว์เลี้ยง: อาหารแมว, หมอ"),
            ChatCommand::AddCategory {
                name: "สัตว์เลี้ยง".to_string(),
                keywords: vec!["อาหารแมว".to_string(), "หมอ".to_string()],
            }
        );
        assert_eq!(
            ChatCommand::parse("เพิ่มหมวดหมู่ ลูก: ของเล่น"),
            ChatCommand::AddCategory {
                name: "ลูก".to_string(),
                keywords: vec!["ของเล่น".to_string()],
            }
        );
    }

    #[test]
    fn test_malformed_add_category() {
        let invalid = ChatCommand::InvalidCategoryCommand(CategoryUsage::Add);
        assert_eq!(ChatCommand::parse("add category"), invalid);
        assert_eq!(ChatCommand::parse("add category pets vet"), invalid);
        assert_eq!(ChatCommand::parse("add category : vet"), invalid);
        assert_eq!(ChatCommand::parse("add category pets: , ,"), invalid);
    }

    #[test]
    fn test_delete_category() {
        assert_eq!(
            ChatCommand::parse("delete category  Pets "),
            ChatCommand::DeleteCategory {
                name: "pets".to_string()
            }
        );
        assert_eq!(
            ChatCommand::parse("ลบหมวด สัตว์เลี้ยง"),
            ChatCommand::DeleteCategory {
                name: "สัตว์เลี้ยง".to_string()
            }
        );
        assert_eq!(
            ChatCommand::parse("delete category"),
            ChatCommand::InvalidCategoryCommand(CategoryUsage::Delete)
        );
    }

    #[test]
    fn test_everything_else_is_recorded() {
        assert_eq!(
            ChatCommand::parse(" rice 50, coffee 45 "),
            ChatCommand::Record("rice 50, coffee 45".to_string())
        );
        // Prefix must end at a word boundary
        assert_eq!(
            ChatCommand::parse("add categorysomething"),
            ChatCommand::Record("add categorysomething".to_string())
        );
        assert_eq!(
            ChatCommand::parse("today rice 50"),
            ChatCommand::Record("today rice 50".to_string())
        );
    }
}
