//! Domain models for Lung Nan

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Whether money came in or went out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Category used when no rule matches a fragment of this kind
    pub fn default_category(&self) -> &'static str {
        match self {
            Self::Income => "general income",
            Self::Expense => "general expense",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A transaction extracted from one message fragment, not yet stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    pub kind: TransactionKind,
    /// Always greater than zero
    pub amount: f64,
    pub category: String,
    pub note: String,
}

/// A stored transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: f64,
    pub category: String,
    pub note: String,
    pub occurred_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Category name mapped to the keywords that select it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    /// Build a rule, dropping blank and repeated keywords while keeping order
    pub fn new<S: Into<String>>(name: S, keywords: impl IntoIterator<Item = S>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into().trim().to_lowercase();
            if !keyword.is_empty() && !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        Self {
            name: name.into().trim().to_string(),
            keywords: unique,
        }
    }
}

/// A user's custom category as stored in the database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomCategory {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub keywords: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CustomCategory> for CategoryRule {
    fn from(category: CustomCategory) -> Self {
        CategoryRule::new(category.name, category.keywords)
    }
}

/// Income and expense sums over a date range
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
}

impl PeriodTotals {
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Summary period selectable from chat, CLI and API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryPeriod {
    Today,
    Month,
}

impl SummaryPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Month => "month",
        }
    }

    /// Inclusive date range ending on `today`
    pub fn range(&self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Today => (today, today),
            Self::Month => (month_start(today), today),
        }
    }
}

impl std::str::FromStr for SummaryPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" | "day" => Ok(Self::Today),
            "month" | "this-month" | "this_month" => Ok(Self::Month),
            _ => Err(format!("Unknown summary period: {} (use today or month)", s)),
        }
    }
}

impl std::fmt::Display for SummaryPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Totals for one summary period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSummary {
    pub period: SummaryPeriod,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub transaction_count: i64,
}

/// Spending total for a single category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        assert_eq!("Income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!(" expense ".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("refund".parse::<TransactionKind>().is_err());
        assert_eq!(TransactionKind::Expense.to_string(), "expense");
    }

    #[test]
    fn test_default_categories() {
        assert_eq!(TransactionKind::Income.default_category(), "general income");
        assert_eq!(TransactionKind::Expense.default_category(), "general expense");
    }

    #[test]
    fn test_category_rule_dedupes_keywords() {
        let rule = CategoryRule::new("pets", vec!["Cat", "cat ", "", "dog", "cat"]);
        assert_eq!(rule.name, "pets");
        assert_eq!(rule.keywords, vec!["cat", "dog"]);
    }

    #[test]
    fn test_month_range_starts_on_first_day() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
        let (from, to) = SummaryPeriod::Month.range(today);
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(to, today);
        assert_eq!(SummaryPeriod::Today.range(today), (today, today));
    }

    #[test]
    fn test_period_totals_balance() {
        let totals = PeriodTotals {
            income: 1000.0,
            expense: 250.5,
        };
        assert_eq!(totals.balance(), 749.5);
    }
}
