//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, resolve_date)
//! - `chat` - Parse and chat commands
//! - `reports` - Summary, health and transaction listing
//! - `categories` - Custom category management
//! - `rich_menu` - LINE rich menu provisioning
//! - `serve` - Webhook server command

pub mod categories;
pub mod chat;
pub mod core;
pub mod reports;
pub mod rich_menu;
pub mod serve;

// Re-export command functions for main.rs
pub use categories::*;
pub use chat::*;
pub use core::*;
pub use reports::*;
pub use rich_menu::*;
pub use serve::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
