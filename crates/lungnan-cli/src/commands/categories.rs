//! Custom category command implementations

use anyhow::{bail, Result};
use lungnan_core::categories::{normalize_category_name, parse_keyword_list};
use lungnan_core::db::Database;
use lungnan_core::replies;
use lungnan_core::CategoryRules;

pub fn cmd_categories_list(db: &Database, user: &str) -> Result<()> {
    let custom = db.list_custom_categories(user)?;

    println!();
    println!("🏷️  Categories for {}", user);
    println!("   ─────────────────────────────────────────────────────────────");
    for category in &custom {
        println!("   • {} ({})", category.name, category.keywords.join(", "));
    }
    if custom.is_empty() {
        println!("   No custom categories");
    }

    println!();
    println!("   Built-in:");
    for rule in CategoryRules::builtin().iter() {
        let overridden = custom.iter().any(|c| c.name == rule.name);
        let marker = if overridden { " (overridden)" } else { "" };
        println!("   • {}{}: {} keywords", rule.name, marker, rule.keywords.len());
    }

    Ok(())
}

pub fn cmd_categories_add(db: &Database, user: &str, name: &str, keywords: &str) -> Result<()> {
    let keywords = parse_keyword_list(keywords);
    if keywords.is_empty() {
        bail!("At least one keyword is required (e.g., \"vet, cat food\")");
    }

    let created = db.upsert_custom_category(user, name, &keywords)?;
    let name = normalize_category_name(name)?;
    println!("✅ {}", replies::category_saved(&name, &keywords, created));

    Ok(())
}

pub fn cmd_categories_delete(db: &Database, user: &str, name: &str) -> Result<()> {
    let removed = db.delete_custom_category(user, name)?;
    let name = normalize_category_name(name)?;
    if removed {
        println!("🗑️  {}", replies::category_deleted(&name, true));
    } else {
        println!("{}", replies::category_deleted(&name, false));
    }

    Ok(())
}
