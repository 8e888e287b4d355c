//! Report command implementations

use anyhow::Result;
use chrono::NaiveDate;
use lungnan_core::db::Database;
use lungnan_core::models::{SummaryPeriod, TransactionKind};
use lungnan_core::replies::{self, format_money};

use super::truncate;

pub fn cmd_summary(db: &Database, user: &str, period: SummaryPeriod, today: NaiveDate) -> Result<()> {
    let summary = db.summary(user, period, today)?;

    println!();
    println!("📊 {} to {}", summary.from, summary.to);
    println!("{}", replies::summary(&summary));

    Ok(())
}

pub fn cmd_health(db: &Database, user: &str, today: NaiveDate) -> Result<()> {
    let snapshot = db.financial_health(user, today)?;

    println!();
    println!("{}", replies::health(&snapshot));

    Ok(())
}

pub fn cmd_transactions(db: &Database, user: &str, limit: i64) -> Result<()> {
    let transactions = db.list_recent_transactions(user, limit)?;

    if transactions.is_empty() {
        println!("No transactions recorded for {}.", user);
        return Ok(());
    }

    println!();
    println!("📋 Recent transactions for {}", user);
    println!("   ─────────────────────────────────────────────────────────────");
    for tx in &transactions {
        let sign = match tx.kind {
            TransactionKind::Income => "+",
            TransactionKind::Expense => "-",
        };
        println!(
            "   {}  {}{:>13}  {:<16} {}",
            tx.occurred_on,
            sign,
            format_money(tx.amount),
            truncate(&tx.category, 16),
            truncate(&tx.note, 40)
        );
    }

    Ok(())
}
