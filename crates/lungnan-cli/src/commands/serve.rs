//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Result};
use lungnan_core::line::{LineClient, ACCESS_TOKEN_ENV};
use lungnan_server::{parse_api_keys, ServerConfig, API_KEYS_ENV, CHANNEL_SECRET_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_auth: bool,
    no_signature_check: bool,
    no_encrypt: bool,
) -> Result<()> {
    let Some(client) = LineClient::from_env() else {
        bail!("Set {} so the bot can reply on LINE", ACCESS_TOKEN_ENV);
    };

    let channel_secret = std::env::var(CHANNEL_SECRET_ENV)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if channel_secret.is_none() && !no_signature_check {
        bail!(
            "Set {} to verify webhooks (or pass --no-signature-check for local testing)",
            CHANNEL_SECRET_ENV
        );
    }

    let api_keys = parse_api_keys(&std::env::var(API_KEYS_ENV).unwrap_or_default());

    println!("🚀 Starting Lung Nan webhook server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    println!("   Webhook URL path: /webhook");
    println!("   LINE API: {}", client.api_base());

    if no_signature_check {
        println!();
        println!("   ⚠️  Webhook signature check DISABLED - do not expose to network!");
    } else {
        println!("   🔐 Webhook signatures: verified ({})", CHANNEL_SECRET_ENV);
    }
    if no_auth {
        println!("   ⚠️  API authentication DISABLED - do not expose to network!");
    } else if api_keys.is_empty() {
        println!("   🔒 API: no keys configured, /api is closed (set {})", API_KEYS_ENV);
    } else {
        println!("   🔑 API keys: {} configured ({})", api_keys.len(), API_KEYS_ENV);
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let config = ServerConfig {
        require_auth: !no_auth,
        api_keys,
        channel_secret: if no_signature_check { None } else { channel_secret },
    };

    lungnan_server::serve(db, host, port, config, Arc::new(client)).await?;

    Ok(())
}
