//! Lung Nan Core Library
//!
//! Shared functionality for the Lung Nan budget chat bot:
//! - Free-text transaction extraction (amounts, income/expense, categories)
//! - Built-in and per-user custom category rules
//! - Financial health scoring
//! - Chat command grammar, reply text and the conversational assistant
//! - Database access and migrations
//! - LINE Messaging API client (replies and rich menu)

pub mod assistant;
pub mod categories;
pub mod chat;
pub mod db;
pub mod error;
pub mod health;
pub mod line;
pub mod models;
pub mod parser;
pub mod replies;

/// Test utilities including mock LINE server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use assistant::BudgetAssistant;
pub use categories::CategoryRules;
pub use chat::{CategoryUsage, ChatCommand};
pub use db::Database;
pub use error::{Error, Result};
pub use health::{assess, HealthInputs, HealthScore, HealthSnapshot};
pub use line::{LineClient, ReplySender};
pub use parser::{parse_transaction, parse_transactions};
