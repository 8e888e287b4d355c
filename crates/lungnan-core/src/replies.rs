//! Chat reply text
//!
//! Everything the bot says is built here so the assistant, server and CLI
//! print identical messages.

use crate::categories::CategoryRules;
use crate::chat::CategoryUsage;
use crate::health::HealthSnapshot;
use crate::models::{CustomCategory, ParsedTransaction, PeriodSummary, SummaryPeriod, TransactionKind};

const EXAMPLES: &str = "- paid lunch 65\n- salary 25000\n- rice 50, coffee 45, taxi 30";

pub fn welcome() -> String {
    format!(
        "Hi, I'm Uncle Nan, your income and expense helper.\n\
         Just type an amount in the chat to start.\n\n\
         Examples:\n{}\n\n\
         Commands:\n\
         - summary today\n\
         - summary month\n\
         - financial health\n\
         - categories\n\
         - help",
        EXAMPLES
    )
}

/// Shown when no amount could be found anywhere in the message
pub fn help() -> String {
    format!(
        "Uncle Nan could not find an amount.\n\
         Try one of these:\n{}\n\
         - +500 sold goods\n\
         - summary today\n\
         - summary month\n\
         - financial health\n\
         - add category pets: vet, cat food\n\
         - delete category pets",
        EXAMPLES
    )
}

/// Confirmation for the transactions recorded from one message
pub fn recorded(items: &[ParsedTransaction]) -> String {
    let (income, expense) = items.iter().fold((0.0, 0.0), |(income, expense), item| {
        match item.kind {
            TransactionKind::Income => (income + item.amount, expense),
            TransactionKind::Expense => (income, expense + item.amount),
        }
    });
    let totals = format!(
        "income {} | expense {} | net {}",
        format_money(income),
        format_money(expense),
        format_money(income - expense)
    );

    if let [item] = items {
        return format!(
            "Recorded\n\
             - Type: {}\n\
             - Category: {}\n\
             - Amount: {} baht\n\
             - This message: {}",
            item.kind,
            item.category,
            format_money(item.amount),
            totals
        );
    }

    let mut lines = vec![format!("Recorded {} items", items.len())];
    for (idx, item) in items.iter().enumerate() {
        lines.push(format!(
            "{}) {} {} baht ({})",
            idx + 1,
            item.kind,
            format_money(item.amount),
            item.category
        ));
    }
    lines.push(format!("This message: {}", totals));
    lines.join("\n")
}

pub fn summary(summary: &PeriodSummary) -> String {
    let title = match summary.period {
        SummaryPeriod::Today => "Today's summary",
        SummaryPeriod::Month => "This month's summary",
    };
    format!(
        "{}\n\
         - Income: {} baht\n\
         - Expense: {} baht\n\
         - Balance: {} baht\n\
         - Transactions: {}",
        title,
        format_money(summary.income),
        format_money(summary.expense),
        format_money(summary.balance),
        summary.transaction_count
    )
}

pub fn health(snapshot: &HealthSnapshot) -> String {
    format!(
        "Financial health (this month)\n\
         - Status: {}\n\
         - Income: {} baht\n\
         - Expense: {} baht\n\
         - Balance: {} baht\n\
         - Expense to income: {}\n\
         - Savings rate: {}\n\
         - Top expense: {} ({} baht)\n\
         - Transactions this month: {}\n\
         - Tip: {}",
        snapshot.score,
        format_money(snapshot.income),
        format_money(snapshot.expense),
        format_money(snapshot.balance),
        format_percent(snapshot.expense_ratio),
        format_percent(snapshot.savings_rate),
        snapshot.top_expense_category,
        format_money(snapshot.top_expense_amount),
        snapshot.transaction_count,
        snapshot.tip
    )
}

/// The user's own categories followed by the built-in names they can override
pub fn categories(custom: &[CustomCategory], builtin: &CategoryRules) -> String {
    let mut lines = Vec::new();

    if custom.is_empty() {
        lines.push("You have no custom categories yet.".to_string());
    } else {
        lines.push("Your categories:".to_string());
        for category in custom {
            lines.push(format!("- {}: {}", category.name, category.keywords.join(", ")));
        }
    }

    let builtin_names: Vec<&str> = builtin.iter().map(|rule| rule.name.as_str()).collect();
    lines.push(format!("Built-in: {}", builtin_names.join(", ")));
    lines.push("Add one with: add category <name>: keyword, keyword".to_string());
    lines.join("\n")
}

pub fn category_saved(name: &str, keywords: &[String], created: bool) -> String {
    let verb = if created { "Added" } else { "Updated" };
    format!("{} category \"{}\": {}", verb, name, keywords.join(", "))
}

pub fn category_deleted(name: &str, removed: bool) -> String {
    if removed {
        format!("Deleted category \"{}\"", name)
    } else {
        format!("You have no custom category named \"{}\"", name)
    }
}

pub fn category_usage(usage: CategoryUsage) -> String {
    match usage {
        CategoryUsage::Add => "To add a category type:\n\
             add category <name>: keyword, keyword\n\
             e.g. add category pets: vet, cat food"
            .to_string(),
        CategoryUsage::Delete => "To delete a category type:\n\
             delete category <name>\n\
             e.g. delete category pets"
            .to_string(),
    }
}

/// A category command that parsed but was rejected on save
pub fn category_rejected(reason: &str) -> String {
    format!("Could not save the category: {}", reason)
}

/// Format an amount with thousands separators and two decimals
pub fn format_money(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, cents) = formatted
        .split_once('.')
        .unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" {
        "-"
    } else {
        ""
    };
    format!("{}{}.{}", sign, grouped, cents)
}

fn format_percent(rate: Option<f64>) -> String {
    match rate {
        Some(rate) => format!("{}%", format_money(rate)),
        None => "not computable".to_string(),
    }
}
