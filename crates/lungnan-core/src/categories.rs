//! Category resolution for parsed fragments
//!
//! A `CategoryRules` value is an ordered list of category rules. The first rule
//! with a matching keyword wins. Built-in rules are a fixed default; per-user
//! custom rules are merged on top at call time, replacing a built-in rule of
//! the same name in place and appending new names at the end.
//!
//! Matching is case-insensitive and also tried with all spaces removed from
//! both keyword and fragment, so "health insurance" matches "healthinsurance".

use once_cell::sync::Lazy;

use crate::error::{Error, Result};
use crate::models::{CategoryRule, TransactionKind};

/// Longest accepted custom category name, in characters
pub const MAX_CATEGORY_NAME_CHARS: usize = 40;

/// Most keywords a single custom category may carry
pub const MAX_KEYWORDS_PER_CATEGORY: usize = 50;

const BUILTIN_CATEGORIES: &[(&str, &[&str])] = &[
    (
        "food",
        &[
            "ข้าว",
            "กาแฟ",
            "อาหาร",
            "ของกิน",
            "ชานม",
            "หมูกระทะ",
            "ก๋วยเตี๋ยว",
            "ชาบู",
            "บุฟเฟต์",
            "กิน",
            "คาเฟ่",
            "อาหารกลางวัน",
            "อาหารเย็น",
            "rice",
            "coffee",
            "food",
            "meal",
            "breakfast",
            "lunch",
            "dinner",
            "snack",
            "noodle",
            "milk tea",
            "cafe",
            "restaurant",
        ],
    ),
    (
        "travel",
        &[
            "เดินทาง",
            "ค่ารถ",
            "ค่าแท็กซี่",
            "แท็กซี่",
            "มอไซ",
            "วิน",
            "รถเมล์",
            "รถไฟ",
            "น้ำมัน",
            "เติมน้ำมัน",
            "ทางด่วน",
            "ค่าทางด่วน",
            "ค่าจอดรถ",
            "ที่จอดรถ",
            "travel",
            "taxi",
            "grab",
            "bolt",
            "lineman",
            "bts",
            "mrt",
            "bus fare",
            "train",
            "fuel",
            "petrol",
            "toll",
            "parking",
        ],
    ),
    (
        "housing",
        &[
            "ค่าเช่า",
            "ค่าไฟ",
            "ค่าน้ำ",
            "ไฟ",
            "น้ำ",
            "เน็ต",
            "อินเทอร์เน็ต",
            "ค่าโทร",
            "ค่าโทรศัพท์",
            "ค่าไฟฟ้า",
            "ค่าบ้าน",
            "rent",
            "electricity",
            "electric bill",
            "water bill",
            "internet",
            "wifi",
            "phone bill",
        ],
    ),
    (
        "shopping",
        &[
            "เสื้อ",
            "รองเท้า",
            "ช้อป",
            "ของใช้",
            "เครื่องสำอาง",
            "กระเป๋า",
            "ของแต่งบ้าน",
            "ช้อปปิ้ง",
            "shopping",
            "shirt",
            "shoes",
            "clothes",
            "cosmetics",
            "handbag",
        ],
    ),
    (
        "health",
        &[
            "หมอ",
            "ยา",
            "โรงพยาบาล",
            "สุขภาพ",
            "คลินิก",
            "ฟิตเนส",
            "ประกันสุขภาพ",
            "doctor",
            "medicine",
            "hospital",
            "clinic",
            "pharmacy",
            "fitness",
            "gym",
            "health insurance",
        ],
    ),
    (
        "side income",
        &[
            "ฟรีแลนซ์",
            "ขาย",
            "คอมมิชชั่น",
            "freelance",
            "commission",
            "side job",
            "sold",
        ],
    ),
    ("salary", &["เงินเดือน", "salary", "payroll", "wage"]),
];

static BUILTIN_RULES: Lazy<CategoryRules> = Lazy::new(|| {
    CategoryRules::from_rules(
        BUILTIN_CATEGORIES
            .iter()
            .map(|(name, keywords)| CategoryRule::new(*name, keywords.iter().copied())),
    )
});

/// Ordered set of category rules used to label fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
}

impl CategoryRules {
    /// The built-in rule set shared by every user
    pub fn builtin() -> &'static CategoryRules {
        &BUILTIN_RULES
    }

    /// Build a rule set from rules in priority order
    ///
    /// A later rule with an already-seen name replaces the earlier one's
    /// keywords without moving it.
    pub fn from_rules(rules: impl IntoIterator<Item = CategoryRule>) -> Self {
        let mut set = Self { rules: Vec::new() };
        for rule in rules {
            set.insert(rule);
        }
        set
    }

    /// A new rule set with `custom` layered over this one
    pub fn merged_with(&self, custom: impl IntoIterator<Item = CategoryRule>) -> Self {
        let mut merged = self.clone();
        for rule in custom {
            merged.insert(rule);
        }
        merged
    }

    fn insert(&mut self, rule: CategoryRule) {
        match self.rules.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => existing.keywords = rule.keywords,
            None => self.rules.push(rule),
        }
    }

    /// First rule with a keyword contained in the fragment
    pub fn find(&self, fragment: &str) -> Option<&CategoryRule> {
        let lowered = fragment.to_lowercase();
        let compact = remove_spaces(&lowered);

        self.rules.iter().find(|rule| {
            rule.keywords.iter().any(|keyword| {
                let keyword = keyword.to_lowercase();
                let compact_keyword = remove_spaces(&keyword);
                lowered.contains(&keyword)
                    || (!compact_keyword.is_empty() && compact.contains(&compact_keyword))
            })
        })
    }

    /// Category label for a fragment of the given kind
    pub fn resolve(&self, fragment: &str, kind: TransactionKind) -> String {
        match self.find(fragment) {
            Some(rule) => rule.name.clone(),
            None => kind.default_category().to_string(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CategoryRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for CategoryRules {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

fn remove_spaces(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Normalize a user-supplied category name
///
/// Whitespace is collapsed and the name lower-cased so "Pet  Food" and
/// "pet food" name the same category.
pub fn normalize_category_name(name: &str) -> Result<String> {
    let normalized = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    if normalized.is_empty() {
        return Err(Error::InvalidCategory("name cannot be empty".to_string()));
    }
    if normalized.chars().count() > MAX_CATEGORY_NAME_CHARS {
        return Err(Error::InvalidCategory(format!(
            "name is longer than {} characters",
            MAX_CATEGORY_NAME_CHARS
        )));
    }
    if normalized.contains([':', '=', ',']) {
        return Err(Error::InvalidCategory(
            "name cannot contain ':', '=' or ','".to_string(),
        ));
    }

    Ok(normalized)
}

/// Split a comma separated keyword list, dropping blanks and repeats
pub fn parse_keyword_list(text: &str) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in text.split([',', '，', '\n']) {
        let keyword = keyword.split_whitespace().collect::<Vec<_>>().join(" ");
        let keyword = keyword.to_lowercase();
        if !keyword.is_empty() && !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

/// Check a keyword list before storing it
pub fn validate_keywords(keywords: &[String]) -> Result<()> {
    if keywords.is_empty() {
        return Err(Error::InvalidCategory(
            "at least one keyword is required".to_string(),
        ));
    }
    if keywords.len() > MAX_KEYWORDS_PER_CATEGORY {
        return Err(Error::InvalidCategory(format!(
            "at most {} keywords are allowed",
            MAX_KEYWORDS_PER_CATEGORY
        )));
    }
    Ok(())
}
