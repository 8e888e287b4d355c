//! Per-user custom category rules

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{parse_datetime, Database};
use crate::categories::{normalize_category_name, validate_keywords, CategoryRules};
use crate::error::Result;
use crate::models::{CategoryRule, CustomCategory};

impl Database {
    /// A user's custom categories in the order they were first created
    pub fn list_custom_categories(&self, user_id: &str) -> Result<Vec<CustomCategory>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, name, keywords, created_at, updated_at
            FROM custom_categories
            WHERE user_id = ?1
            ORDER BY id
            "#,
        )?;

        let rows = stmt
            .query_map(params![user_id], |row| {
                let keywords_json: String = row.get(3)?;
                let created_at_str: String = row.get(4)?;
                let updated_at_str: String = row.get(5)?;
                Ok(CustomCategory {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    name: row.get(2)?,
                    keywords: serde_json::from_str(&keywords_json).unwrap_or_default(),
                    created_at: parse_datetime(&created_at_str),
                    updated_at: parse_datetime(&updated_at_str),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(rows)
    }

    /// Create or replace a custom category
    ///
    /// Returns `true` when the category is new, `false` when an existing one
    /// had its keywords replaced. Updating keeps the original position.
    pub fn upsert_custom_category(
        &self,
        user_id: &str,
        name: &str,
        keywords: &[String],
    ) -> Result<bool> {
        let name = normalize_category_name(name)?;
        let rule = CategoryRule::new(name.as_str(), keywords.iter().map(String::as_str));
        validate_keywords(&rule.keywords)?;
        let keywords_json = serde_json::to_string(&rule.keywords)?;

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing: Option<i64> = tx
            .query_row(
                "SELECT id FROM custom_categories WHERE user_id = ?1 AND name = ?2",
                params![user_id, name],
                |row| row.get(0),
            )
            .optional()?;

        let created = match existing {
            Some(id) => {
                tx.execute(
                    "UPDATE custom_categories SET keywords = ?1, updated_at = CURRENT_TIMESTAMP WHERE id = ?2",
                    params![keywords_json, id],
                )?;
                false
            }
            None => {
                tx.execute(
                    "INSERT INTO custom_categories (user_id, name, keywords) VALUES (?1, ?2, ?3)",
                    params![user_id, name, keywords_json],
                )?;
                true
            }
        };
        tx.commit()?;

        info!(user_id, category = %name, created, "Saved custom category");
        Ok(created)
    }

    /// Remove a custom category, returning whether one existed
    ///
    /// Built-in categories are not stored, so deleting a built-in name only
    /// removes the user's override.
    pub fn delete_custom_category(&self, user_id: &str, name: &str) -> Result<bool> {
        let name = normalize_category_name(name)?;
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM custom_categories WHERE user_id = ?1 AND name = ?2",
            params![user_id, name],
        )?;

        if removed > 0 {
            info!(user_id, category = %name, "Deleted custom category");
        }
        Ok(removed > 0)
    }

    /// Built-in rules merged with the user's current custom rules
    ///
    /// Read fresh on every call so a category change is visible to the very
    /// next message.
    pub fn merged_category_rules(&self, user_id: &str) -> Result<CategoryRules> {
        let custom = self.list_custom_categories(user_id)?;
        Ok(CategoryRules::builtin().merged_with(custom.into_iter().map(CategoryRule::from)))
    }
}
