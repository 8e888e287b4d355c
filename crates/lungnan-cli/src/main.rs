//! Lung Nan CLI - Income and expense logging over LINE chat
//!
//! Usage:
//!   lungnan init                       Initialize database
//!   lungnan serve --port 3000          Start the LINE webhook server
//!   lungnan chat "rice 50, coffee 45"  Talk to the bot locally
//!   lungnan summary --period month     Show totals

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db, cli.no_encrypt),
        Commands::Serve {
            port,
            host,
            no_auth,
            no_signature_check,
        } => {
            commands::cmd_serve(
                &cli.db,
                &host,
                port,
                no_auth,
                no_signature_check,
                cli.no_encrypt,
            )
            .await
        }
        Commands::Parse { text, user, json } => {
            let db = match user {
                Some(_) => Some(commands::open_db(&cli.db, cli.no_encrypt)?),
                None => None,
            };
            commands::cmd_parse(db.as_ref(), &text, user.as_deref(), json)
        }
        Commands::Chat { text, user, date } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let today = commands::resolve_date(date.as_deref())?;
            commands::cmd_chat(&db, &user, &text, today)
        }
        Commands::Summary { user, period, date } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let period = period.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let today = commands::resolve_date(date.as_deref())?;
            commands::cmd_summary(&db, &user, period, today)
        }
        Commands::Health { user, date } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            let today = commands::resolve_date(date.as_deref())?;
            commands::cmd_health(&db, &user, today)
        }
        Commands::Transactions { user, limit } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            commands::cmd_transactions(&db, &user, limit)
        }
        Commands::Categories { user, action } => {
            let db = commands::open_db(&cli.db, cli.no_encrypt)?;
            match action {
                None | Some(CategoriesAction::List) => commands::cmd_categories_list(&db, &user),
                Some(CategoriesAction::Add { name, keywords }) => {
                    commands::cmd_categories_add(&db, &user, &name, &keywords)
                }
                Some(CategoriesAction::Delete { name }) => {
                    commands::cmd_categories_delete(&db, &user, &name)
                }
            }
        }
        Commands::RichMenu { image, dry_run } => {
            let client = if dry_run {
                None
            } else {
                Some(lungnan_core::LineClient::from_env().ok_or_else(|| {
                    anyhow::anyhow!(
                        "Set {} to provision the rich menu",
                        lungnan_core::line::ACCESS_TOKEN_ENV
                    )
                })?)
            };
            commands::cmd_rich_menu(client.as_ref(), &image).await
        }
    }
}
