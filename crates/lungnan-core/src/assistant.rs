//! Conversational assistant
//!
//! Maps one chat message to one reply: commands read reports or edit custom
//! categories, anything else is parsed and recorded as transactions.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::categories::CategoryRules;
use crate::chat::ChatCommand;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::parser::parse_transactions;
use crate::replies;

/// Answers chat messages for any user against one database
pub struct BudgetAssistant<'a> {
    db: &'a Database,
}

impl<'a> BudgetAssistant<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Reply for a user who just added the bot
    pub fn welcome(&self) -> String {
        replies::welcome()
    }

    /// Handle one text message and return the reply
    ///
    /// `today` dates recorded transactions and anchors the summaries. Only
    /// storage failures are errors; bad input always gets a friendly reply.
    pub fn handle_text(&self, user_id: &str, text: &str, today: NaiveDate) -> Result<String> {
        let command = ChatCommand::parse(text);
        debug!(user_id, command = ?command, "Handling chat message");

        match command {
            ChatCommand::SummaryToday => Ok(replies::summary(&self.db.summary_today(user_id, today)?)),
            ChatCommand::SummaryMonth => Ok(replies::summary(&self.db.summary_month(user_id, today)?)),
            ChatCommand::Health => Ok(replies::health(&self.db.financial_health(user_id, today)?)),
            ChatCommand::Help => Ok(replies::help()),
            ChatCommand::ListCategories => {
                let custom = self.db.list_custom_categories(user_id)?;
                Ok(replies::categories(&custom, CategoryRules::builtin()))
            }
            ChatCommand::AddCategory { name, keywords } => {
                match self.db.upsert_custom_category(user_id, &name, &keywords) {
                    Ok(created) => Ok(replies::category_saved(&name, &keywords, created)),
                    Err(Error::InvalidCategory(reason)) => Ok(replies::category_rejected(&reason)),
                    Err(e) => Err(e),
                }
            }
            ChatCommand::DeleteCategory { name } => {
                let removed = self.db.delete_custom_category(user_id, &name)?;
                Ok(replies::category_deleted(&name, removed))
            }
            ChatCommand::InvalidCategoryCommand(usage) => Ok(replies::category_usage(usage)),
            ChatCommand::Record(text) => self.record(user_id, &text, today),
        }
    }

    fn record(&self, user_id: &str, text: &str, today: NaiveDate) -> Result<String> {
        // Fetched per message so category edits apply immediately
        let rules = self.db.merged_category_rules(user_id)?;
        let items = parse_transactions(text, Some(&rules));
        if items.is_empty() {
            return Ok(replies::help());
        }

        self.db.record_transactions(user_id, &items, today)?;
        info!(user_id, count = items.len(), "Recorded transactions from chat");
        Ok(replies::recorded(&items))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_records_multiple_entries() {
        let db = Database::in_memory().unwrap();
        let assistant = BudgetAssistant::new(&db);

        let reply = assistant
            .handle_text("U1", "rice 50, coffee 45, taxi 30", today())
            .unwrap();
        assert!(reply.starts_with("Recorded 3 items"));

        let summary = db.summary_today("U1", today()).unwrap();
        assert_eq!(summary.expense, 125.0);
        assert_eq!(summary.transaction_count, 3);
    }

    #[test]
    fn test_unparsable_message_gets_help() {
        let db = Database::in_memory().unwrap();
        let assistant = BudgetAssistant::new(&db);

        let reply = assistant
            .handle_text("U1", "coffee with friend", today())
            .unwrap();
        assert_eq!(reply, replies::help());
        assert!(db.list_recent_transactions("U1", 10).unwrap().is_empty());
    }

    #[test]
    fn test_summary_commands() {
        let db = Database::in_memory().unwrap();
        let assistant = BudgetAssistant::new(&db);
        assistant.handle_text("U1", "salary 25000", today()).unwrap();

        let reply = assistant.handle_text("U1", "summary today", today()).unwrap();
        assert!(reply.starts_with("Today's summary"));
        assert!(reply.contains("- Income: 25,000.00 baht"));

        let reply = assistant.handle_text("U1", "สรุปเดือนนี้", today()).unwrap();
        assert!(reply.starts_with("This month's summary"));
    }

    #[test]
    fn test_health_command() {
        let db = Database::in_memory().unwrap();
        let assistant = BudgetAssistant::new(&db);

        let reply = assistant.handle_text("U1", "financial health", today()).unwrap();
        assert!(reply.contains("- Status: insufficient data"));
        assert!(reply.contains("- Savings rate: not computable"));
    }

    #[test]
    fn test_custom_category_applies_to_next_message() {
        let db = Database::in_memory().unwrap();
        let assistant = BudgetAssistant::new(&db);

        let reply = assistant
            .handle_text("U1", "add category pets: vet, cat food", today())
            .unwrap();
        assert!(reply.starts_with("Added category \"pets\""));

        let reply = assistant.handle_text("U1", "vet 800", today()).unwrap();
        assert!(reply.contains("- Category: pets"));

        // Other users keep the built-in rules
        let reply = assistant.handle_text("U2", "vet 800", today()).unwrap();
        assert!(reply.contains("- Category: general expense"));

        let reply = assistant
            .handle_text("U1", "delete category pets", today())
            .unwrap();
        assert_eq!(reply, "Deleted category \"pets\"");
        let reply = assistant.handle_text("U1", "vet 800", today()).unwrap();
        assert!(reply.contains("- Category: general expense"));
    }

    #[test]
    fn test_category_usage_and_rejection() {
        let db = Database::in_memory().unwrap();
        let assistant = BudgetAssistant::new(&db);

        let reply = assistant.handle_text("U1", "add category pets", today()).unwrap();
        assert!(reply.starts_with("To add a category"));

        let keywords: Vec<String> = (0..60).map(|i| format!("kw{}", i)).collect();
        let text = format!("add category many: {}", keywords.join(", "));
        let reply = assistant.handle_text("U1", &text, today()).unwrap();
        assert!(reply.starts_with("Could not save the category"));
    }

    #[test]
    fn test_list_categories() {
        let db = Database::in_memory().unwrap();
        let assistant = BudgetAssistant::new(&db);
        assistant
            .handle_text("U1", "add category pets: vet", today())
            .unwrap();

        let reply = assistant.handle_text("U1", "categories", today()).unwrap();
        assert!(reply.contains("- pets: vet"));
        assert!(reply.contains("Built-in: food"));
    }
}
