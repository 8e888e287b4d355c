//! Financial health scoring
//!
//! Turns one month of aggregated totals into a qualitative score and a tip.
//! Rates are only defined when there is income; otherwise they are `None`,
//! which callers must show as "not computable" rather than zero.

use serde::{Deserialize, Serialize};

use crate::models::CategoryTotal;

/// Label used when the month has no expenses yet
pub const NO_TOP_CATEGORY: &str = "no data";

/// Aggregates for one user and one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthInputs {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub transaction_count: i64,
    pub top_expense: Option<CategoryTotal>,
}

impl HealthInputs {
    pub fn new(
        income: f64,
        expense: f64,
        transaction_count: i64,
        top_expense: Option<CategoryTotal>,
    ) -> Self {
        Self {
            income,
            expense,
            balance: income - expense,
            transaction_count,
            top_expense,
        }
    }
}

/// Qualitative health label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthScore {
    /// Spending with no income recorded
    NeedsAttention,
    /// Nothing recorded this month
    InsufficientData,
    Excellent,
    Good,
    Fair,
    /// Spending more than earning
    NeedsAdjustment,
}

impl HealthScore {
    /// Score for a computable savings rate, in percent
    pub fn from_savings_rate(rate: f64) -> Self {
        if rate >= 30.0 {
            Self::Excellent
        } else if rate >= 10.0 {
            Self::Good
        } else if rate >= 0.0 {
            Self::Fair
        } else {
            Self::NeedsAdjustment
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::NeedsAttention => "needs attention",
            Self::InsufficientData => "insufficient data",
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsAdjustment => "needs adjustment",
        }
    }

    pub fn tip(&self) -> &'static str {
        match self {
            Self::NeedsAttention => {
                "No income recorded this month but there are expenses. Try setting a daily spending cap."
            }
            Self::InsufficientData => {
                "Keep logging income and expenses so the analysis has something to work with."
            }
            Self::Excellent => "Great saving discipline. Keep it up.",
            Self::Good => "Trim your top expense category a little to save more.",
            Self::Fair => "Set aside 5-10% of every income automatically.",
            Self::NeedsAdjustment => {
                "You are spending more than you earn. Cut non-essential spending and set a daily cap."
            }
        }
    }
}

impl std::fmt::Display for HealthScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Derived, never stored, view of a month's finances
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub income: f64,
    pub expense: f64,
    pub balance: f64,
    pub transaction_count: i64,
    /// Percent of income kept; `None` when income is not positive
    pub savings_rate: Option<f64>,
    /// Percent of income spent; `None` when income is not positive
    pub expense_ratio: Option<f64>,
    pub top_expense_category: String,
    pub top_expense_amount: f64,
    pub score: HealthScore,
    pub tip: String,
}

/// Score a month of aggregates
pub fn assess(inputs: &HealthInputs) -> HealthSnapshot {
    let (savings_rate, expense_ratio) = if inputs.income > 0.0 {
        (
            Some(inputs.balance * 100.0 / inputs.income),
            Some(inputs.expense * 100.0 / inputs.income),
        )
    } else {
        (None, None)
    };

    let score = match savings_rate {
        Some(rate) => HealthScore::from_savings_rate(rate),
        None if inputs.expense > 0.0 => HealthScore::NeedsAttention,
        None => HealthScore::InsufficientData,
    };

    let (top_expense_category, top_expense_amount) = match &inputs.top_expense {
        Some(top) => (top.category.clone(), top.amount),
        None => (NO_TOP_CATEGORY.to_string(), 0.0),
    };

    HealthSnapshot {
        income: inputs.income,
        expense: inputs.expense,
        balance: inputs.balance,
        transaction_count: inputs.transaction_count,
        savings_rate,
        expense_ratio,
        top_expense_category,
        top_expense_amount,
        score,
        tip: score.tip().to_string(),
    }
}
