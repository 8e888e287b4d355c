//! Database tests

use super::*;
use crate::models::*;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::health::HealthScore;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn parsed(kind: TransactionKind, amount: f64, category: &str) -> ParsedTransaction {
        ParsedTransaction {
            kind,
            amount,
            category: category.to_string(),
            note: format!("{} {}", category, amount),
        }
    }

    #[test]
    fn test_in_memory_db() {
        let db = Database::in_memory().unwrap();
        let recent = db.list_recent_transactions("U1", 10).unwrap();
        assert!(recent.is_empty());
    }

    #[test]
    fn test_schema_exists() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();

        let columns: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'user_id', 'txn_type', 'amount', 'category', 'note', 'occurred_on', 'created_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(columns, 8);

        let columns: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('custom_categories') WHERE name IN ('id', 'user_id', 'name', 'keywords', 'created_at', 'updated_at')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(columns, 6);
    }

    #[test]
    fn test_txn_type_check_constraint() {
        let db = Database::in_memory().unwrap();
        let conn = db.conn().unwrap();
        let result = conn.execute(
            "INSERT INTO transactions (user_id, txn_type, amount, category, occurred_on) VALUES ('U1', 'refund', 10, 'x', '2024-01-01')",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_and_list_transactions() {
        let db = Database::in_memory().unwrap();
        let today = date(2024, 3, 15);

        let id = db
            .record_transaction("U1", &parsed(TransactionKind::Expense, 50.0, "food"), today)
            .unwrap();
        assert!(id > 0);
        db.record_transaction("U2", &parsed(TransactionKind::Income, 10.0, "salary"), today)
            .unwrap();

        let recent = db.list_recent_transactions("U1", 10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].id, id);
        assert_eq!(recent[0].kind, TransactionKind::Expense);
        assert_eq!(recent[0].amount, 50.0);
        assert_eq!(recent[0].category, "food");
        assert_eq!(recent[0].occurred_on, today);
    }

    #[test]
    fn test_record_rejects_invalid_amount() {
        let db = Database::in_memory().unwrap();
        let result = db.record_transaction(
            "U1",
            &parsed(TransactionKind::Expense, 0.0, "food"),
            date(2024, 3, 15),
        );
        assert!(result.is_err());

        let result = db.record_transaction(
            "",
            &parsed(TransactionKind::Expense, 5.0, "food"),
            date(2024, 3, 15),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_record_transactions_batch() {
        let db = Database::in_memory().unwrap();
        let items = vec![
            parsed(TransactionKind::Expense, 50.0, "food"),
            parsed(TransactionKind::Expense, 30.0, "travel"),
        ];
        let ids = db
            .record_transactions("U1", &items, date(2024, 3, 15))
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids[0] < ids[1]);

        // Nothing is stored when any item is invalid
        let bad = vec![
            parsed(TransactionKind::Expense, 10.0, "food"),
            parsed(TransactionKind::Expense, -1.0, "food"),
        ];
        assert!(db.record_transactions("U1", &bad, date(2024, 3, 15)).is_err());
        assert_eq!(db.list_recent_transactions("U1", 10).unwrap().len(), 2);
    }

    #[test]
    fn test_aggregate_scoped_by_user_and_dates() {
        let db = Database::in_memory().unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Income, 1000.0, "salary"), date(2024, 3, 1))
            .unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 200.0, "food"), date(2024, 3, 10))
            .unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 999.0, "food"), date(2024, 2, 28))
            .unwrap();
        db.record_transaction("U2", &parsed(TransactionKind::Expense, 777.0, "food"), date(2024, 3, 10))
            .unwrap();

        let totals = db.aggregate("U1", date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(totals.income, 1000.0);
        assert_eq!(totals.expense, 200.0);
        assert_eq!(totals.balance(), 800.0);

        assert_eq!(
            db.transaction_count("U1", date(2024, 3, 1), date(2024, 3, 31)).unwrap(),
            2
        );

        let empty = db.aggregate("U3", date(2024, 3, 1), date(2024, 3, 31)).unwrap();
        assert_eq!(empty, PeriodTotals::default());
    }

    #[test]
    fn test_top_expense_category() {
        let db = Database::in_memory().unwrap();
        let day = date(2024, 3, 10);
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 100.0, "food"), day)
            .unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 80.0, "food"), day)
            .unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 150.0, "travel"), day)
            .unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Income, 5000.0, "salary"), day)
            .unwrap();

        let top = db.top_expense_category("U1", day, day).unwrap().unwrap();
        assert_eq!(top.category, "food");
        assert_eq!(top.amount, 180.0);

        assert!(db
            .top_expense_category("U2", day, day)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_summary_today_and_month() {
        let db = Database::in_memory().unwrap();
        let today = date(2024, 3, 15);
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 40.0, "food"), today)
            .unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Income, 500.0, "salary"), date(2024, 3, 2))
            .unwrap();

        let day = db.summary_today("U1", today).unwrap();
        assert_eq!(day.period, SummaryPeriod::Today);
        assert_eq!(day.income, 0.0);
        assert_eq!(day.expense, 40.0);
        assert_eq!(day.balance, -40.0);
        assert_eq!(day.transaction_count, 1);

        let month = db.summary_month("U1", today).unwrap();
        assert_eq!(month.from, date(2024, 3, 1));
        assert_eq!(month.income, 500.0);
        assert_eq!(month.balance, 460.0);
        assert_eq!(month.transaction_count, 2);
    }

    #[test]
    fn test_financial_health_current_month_only() {
        let db = Database::in_memory().unwrap();
        let today = date(2024, 3, 20);
        db.record_transaction("U1", &parsed(TransactionKind::Income, 1000.0, "salary"), date(2024, 3, 1))
            .unwrap();
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 700.0, "housing"), date(2024, 3, 5))
            .unwrap();
        // Last month is ignored
        db.record_transaction("U1", &parsed(TransactionKind::Expense, 5000.0, "shopping"), date(2024, 2, 27))
            .unwrap();

        let health = db.financial_health("U1", today).unwrap();
        assert_eq!(health.income, 1000.0);
        assert_eq!(health.expense, 700.0);
        assert_eq!(health.transaction_count, 2);
        assert_eq!(health.savings_rate, Some(30.0));
        assert_eq!(health.score, HealthScore::Excellent);
        assert_eq!(health.top_expense_category, "housing");
    }

    #[test]
    fn test_financial_health_empty_month() {
        let db = Database::in_memory().unwrap();
        let health = db.financial_health("U1", date(2024, 3, 20)).unwrap();
        assert_eq!(health.score, HealthScore::InsufficientData);
        assert_eq!(health.savings_rate, None);
        assert_eq!(health.top_expense_category, "no data");
    }

    #[test]
    fn test_custom_category_upsert_reports_creation() {
        let db = Database::in_memory().unwrap();

        let created = db
            .upsert_custom_category("U1", "Pets", &["vet".to_string(), "cat food".to_string()])
            .unwrap();
        assert!(created);

        let created = db
            .upsert_custom_category("U1", "pets", &["groomer".to_string()])
            .unwrap();
        assert!(!created);

        let categories = db.list_custom_categories("U1").unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "pets");
        assert_eq!(categories[0].keywords, vec!["groomer"]);

        assert!(db.list_custom_categories("U2").unwrap().is_empty());
    }

    #[test]
    fn test_custom_category_validation() {
        let db = Database::in_memory().unwrap();
        assert!(db.upsert_custom_category("U1", "pets", &[]).is_err());
        assert!(db
            .upsert_custom_category("U1", "  ", &["vet".to_string()])
            .is_err());
    }

    #[test]
    fn test_custom_categories_keep_insertion_order() {
        let db = Database::in_memory().unwrap();
        db.upsert_custom_category("U1", "pets", &["vet".to_string()])
            .unwrap();
        db.upsert_custom_category("U1", "kids", &["toy".to_string()])
            .unwrap();
        // Updating does not move a category to the end
        db.upsert_custom_category("U1", "pets", &["groomer".to_string()])
            .unwrap();

        let names: Vec<String> = db
            .list_custom_categories("U1")
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["pets", "kids"]);
    }

    #[test]
    fn test_delete_custom_category() {
        let db = Database::in_memory().unwrap();
        db.upsert_custom_category("U1", "pets", &["vet".to_string()])
            .unwrap();

        assert!(db.delete_custom_category("U1", "Pets").unwrap());
        assert!(!db.delete_custom_category("U1", "pets").unwrap());
        assert!(!db.delete_custom_category("U1", "food").unwrap());
    }

    #[test]
    fn test_merged_rules_reflect_latest_changes() {
        let db = Database::in_memory().unwrap();
        let rules = db.merged_category_rules("U1").unwrap();
        assert_eq!(rules.resolve("rice 50", TransactionKind::Expense), "food");

        db.upsert_custom_category("U1", "food", &["durian".to_string()])
            .unwrap();
        let rules = db.merged_category_rules("U1").unwrap();
        assert_eq!(
            rules.resolve("rice 50", TransactionKind::Expense),
            "general expense"
        );
        assert_eq!(rules.resolve("durian 90", TransactionKind::Expense), "food");

        db.delete_custom_category("U1", "food").unwrap();
        let rules = db.merged_category_rules("U1").unwrap();
        assert_eq!(rules.resolve("rice 50", TransactionKind::Expense), "food");
    }
}
