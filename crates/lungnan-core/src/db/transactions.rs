//! Transaction recording and listing

use chrono::NaiveDate;
use rusqlite::params;
use tracing::debug;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{ParsedTransaction, Transaction, TransactionKind};

impl Database {
    /// Store one parsed transaction for a user on the given date
    pub fn record_transaction(
        &self,
        user_id: &str,
        parsed: &ParsedTransaction,
        occurred_on: NaiveDate,
    ) -> Result<i64> {
        validate_transaction(user_id, parsed)?;
        let conn = self.conn()?;

        conn.execute(
            r#"
            INSERT INTO transactions (user_id, txn_type, amount, category, note, occurred_on)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                user_id,
                parsed.kind.as_str(),
                parsed.amount,
                parsed.category,
                parsed.note,
                occurred_on.to_string(),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(user_id, id, kind = %parsed.kind, amount = parsed.amount, "Recorded transaction");
        Ok(id)
    }

    /// Store every transaction from one message atomically
    pub fn record_transactions(
        &self,
        user_id: &str,
        parsed: &[ParsedTransaction],
        occurred_on: NaiveDate,
    ) -> Result<Vec<i64>> {
        for item in parsed {
            validate_transaction(user_id, item)?;
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut ids = Vec::with_capacity(parsed.len());
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO transactions (user_id, txn_type, amount, category, note, occurred_on)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )?;
            for item in parsed {
                stmt.execute(params![
                    user_id,
                    item.kind.as_str(),
                    item.amount,
                    item.category,
                    item.note,
                    occurred_on.to_string(),
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;

        debug!(user_id, count = ids.len(), "Recorded message transactions");
        Ok(ids)
    }

    /// Most recent transactions for a user, newest first
    pub fn list_recent_transactions(&self, user_id: &str, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, txn_type, amount, category, note, occurred_on, created_at
            FROM transactions
            WHERE user_id = ?1
            ORDER BY occurred_on DESC, id DESC
            LIMIT ?2
            "#,
        )?;

        let transactions = stmt
            .query_map(params![user_id, limit], row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }
}

fn validate_transaction(user_id: &str, parsed: &ParsedTransaction) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(Error::InvalidData("user id cannot be empty".to_string()));
    }
    if !(parsed.amount > 0.0 && parsed.amount.is_finite()) {
        return Err(Error::InvalidData(format!(
            "amount must be positive, got {}",
            parsed.amount
        )));
    }
    if parsed.category.trim().is_empty() {
        return Err(Error::InvalidData("category cannot be empty".to_string()));
    }
    Ok(())
}

/// Column order: id, user_id, txn_type, amount, category, note, occurred_on, created_at
fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
    let kind_str: String = row.get(2)?;
    let date_str: String = row.get(6)?;
    let created_at_str: String = row.get(7)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: kind_str.parse().unwrap_or(TransactionKind::Expense),
        amount: row.get(3)?,
        category: row.get(4)?,
        note: row.get(5)?,
        occurred_on: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or_default(),
        created_at: parse_datetime(&created_at_str),
    })
}
