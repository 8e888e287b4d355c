//! Period totals and financial health

use chrono::NaiveDate;
use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::Result;
use crate::health::{assess, HealthInputs, HealthSnapshot};
use crate::models::{CategoryTotal, PeriodSummary, PeriodTotals, SummaryPeriod};

impl Database {
    /// Income and expense sums for a user between two dates, inclusive
    pub fn aggregate(&self, user_id: &str, from: NaiveDate, to: NaiveDate) -> Result<PeriodTotals> {
        let conn = self.conn()?;
        let (income, expense): (f64, f64) = conn.query_row(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN txn_type = 'income' THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN txn_type = 'expense' THEN amount ELSE 0 END), 0)
            FROM transactions
            WHERE user_id = ?1 AND occurred_on BETWEEN ?2 AND ?3
            "#,
            params![user_id, from.to_string(), to.to_string()],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(PeriodTotals { income, expense })
    }

    /// Expense category with the largest total in the range
    ///
    /// Ties go to the alphabetically first category.
    pub fn top_expense_category(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Option<CategoryTotal>> {
        let conn = self.conn()?;
        let top = conn
            .query_row(
                r#"
                SELECT category, SUM(amount) AS total
                FROM transactions
                WHERE user_id = ?1 AND txn_type = 'expense' AND occurred_on BETWEEN ?2 AND ?3
                GROUP BY category
                ORDER BY total DESC, category ASC
                LIMIT 1
                "#,
                params![user_id, from.to_string(), to.to_string()],
                |row| {
                    Ok(CategoryTotal {
                        category: row.get(0)?,
                        amount: row.get(1)?,
                    })
                },
            )
            .optional()?;

        Ok(top)
    }

    /// Number of transactions a user logged in the range
    pub fn transaction_count(&self, user_id: &str, from: NaiveDate, to: NaiveDate) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM transactions WHERE user_id = ?1 AND occurred_on BETWEEN ?2 AND ?3",
            params![user_id, from.to_string(), to.to_string()],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Totals for a summary period ending on `today`
    pub fn summary(
        &self,
        user_id: &str,
        period: SummaryPeriod,
        today: NaiveDate,
    ) -> Result<PeriodSummary> {
        let (from, to) = period.range(today);
        let totals = self.aggregate(user_id, from, to)?;
        let transaction_count = self.transaction_count(user_id, from, to)?;

        Ok(PeriodSummary {
            period,
            from,
            to,
            income: totals.income,
            expense: totals.expense,
            balance: totals.balance(),
            transaction_count,
        })
    }

    pub fn summary_today(&self, user_id: &str, today: NaiveDate) -> Result<PeriodSummary> {
        self.summary(user_id, SummaryPeriod::Today, today)
    }

    pub fn summary_month(&self, user_id: &str, today: NaiveDate) -> Result<PeriodSummary> {
        self.summary(user_id, SummaryPeriod::Month, today)
    }

    /// Health snapshot for the month containing `today`, recomputed on every call
    pub fn financial_health(&self, user_id: &str, today: NaiveDate) -> Result<HealthSnapshot> {
        let (from, to) = SummaryPeriod::Month.range(today);
        let totals = self.aggregate(user_id, from, to)?;
        let count = self.transaction_count(user_id, from, to)?;
        let top = self.top_expense_category(user_id, from, to)?;

        Ok(assess(&HealthInputs::new(
            totals.income,
            totals.expense,
            count,
            top,
        )))
    }
}
