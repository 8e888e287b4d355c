//! Parse and chat command implementations

use anyhow::Result;
use chrono::NaiveDate;
use lungnan_core::db::Database;
use lungnan_core::parser::{infer_message_kind, parse_transactions};
use lungnan_core::replies::format_money;
use lungnan_core::BudgetAssistant;

use super::truncate;

/// Show what a message would record, without saving anything
///
/// With a user (and database), that user's custom categories apply.
pub fn cmd_parse(db: Option<&Database>, text: &str, user: Option<&str>, json: bool) -> Result<()> {
    let items = match (db, user) {
        (Some(db), Some(user)) => {
            let rules = db.merged_category_rules(user)?;
            parse_transactions(text, Some(&rules))
        }
        _ => parse_transactions(text, None),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No amount found in the message.");
        return Ok(());
    }

    let message_kind = infer_message_kind(text)
        .map(|k| k.to_string())
        .unwrap_or_else(|| "mixed/none".to_string());

    println!();
    println!("🧾 Parsed {} transaction(s) (message kind: {})", items.len(), message_kind);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<8} {:>14}  {:<16} Note",
        "Kind", "Amount", "Category"
    );
    for item in &items {
        println!(
            "   {:<8} {:>14}  {:<16} {}",
            item.kind.as_str(),
            format_money(item.amount),
            truncate(&item.category, 16),
            truncate(&item.note, 40)
        );
    }

    Ok(())
}

/// Send one message through the assistant and print the reply
pub fn cmd_chat(db: &Database, user: &str, text: &str, today: NaiveDate) -> Result<()> {
    let reply = BudgetAssistant::new(db).handle_text(user, text, today)?;
    println!("{}", reply);
    Ok(())
}
