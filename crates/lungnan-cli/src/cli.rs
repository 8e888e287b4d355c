//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Lung Nan - Income and expense logging over LINE chat
#[derive(Parser)]
#[command(name = "lungnan")]
#[command(about = "LINE chat bot for logging income and expenses", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "lungnan.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable database encryption (not recommended for production)
    ///
    /// By default, the database is encrypted using SQLCipher.
    /// Set LUNGNAN_DB_KEY environment variable with your passphrase.
    /// Use --no-encrypt only for development or testing.
    #[arg(long, global = true)]
    pub no_encrypt: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the LINE webhook server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable API key authentication on /api (for local development only)
        #[arg(long)]
        no_auth: bool,

        /// Accept webhooks without checking X-Line-Signature (for local development only)
        ///
        /// WARNING: anyone who can reach the server can then record
        /// transactions for any user.
        #[arg(long)]
        no_signature_check: bool,
    },

    /// Parse a message and show the transactions it contains (nothing is saved)
    Parse {
        /// Message text
        text: String,

        /// Include this user's custom categories
        #[arg(short, long)]
        user: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Send a chat message as a user and print the bot's reply
    Chat {
        /// Message text
        text: String,

        /// User id to chat as
        #[arg(short, long, default_value = "cli")]
        user: String,

        /// Date to record under (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show income, expense and balance for today or this month
    Summary {
        /// User id
        #[arg(short, long, default_value = "cli")]
        user: String,

        /// Period: today or month
        #[arg(short, long, default_value = "today")]
        period: String,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show this month's financial health
    Health {
        /// User id
        #[arg(short, long, default_value = "cli")]
        user: String,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List a user's most recent transactions
    Transactions {
        /// User id
        #[arg(short, long, default_value = "cli")]
        user: String,

        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: i64,
    },

    /// Manage a user's custom categories
    Categories {
        /// User id
        #[arg(short, long, default_value = "cli", global = true)]
        user: String,

        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Create the bot's rich menu on LINE and make it the default
    RichMenu {
        /// Menu image (PNG or JPEG, 2500x843)
        #[arg(short, long)]
        image: PathBuf,

        /// Print the menu JSON without calling LINE
        #[arg(long)]
        dry_run: bool,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List custom and built-in categories
    List,

    /// Add a category or replace its keywords
    Add {
        /// Category name (a built-in name overrides that category)
        name: String,

        /// Comma-separated keywords (e.g., "vet, cat food")
        keywords: String,
    },

    /// Delete a custom category
    Delete {
        /// Category name
        name: String,
    },
}
