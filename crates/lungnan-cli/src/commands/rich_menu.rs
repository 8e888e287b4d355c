//! Rich menu command implementation

use std::path::Path;

use anyhow::{Context, Result};
use lungnan_core::line::{default_rich_menu, image_content_type, LineClient};

/// Provision the default rich menu, or print it when no client is given
pub async fn cmd_rich_menu(client: Option<&LineClient>, image: &Path) -> Result<()> {
    let menu = default_rich_menu();
    let content_type = image_content_type(image)?;

    let Some(client) = client else {
        println!("{}", serde_json::to_string_pretty(&menu)?);
        println!();
        println!("Dry run: image {} was not uploaded", image.display());
        return Ok(());
    };

    println!("🖼️  Provisioning rich menu '{}'...", menu.name);
    println!("   API: {}", client.api_base());

    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {}", image.display()))?;
    let id = client
        .provision_rich_menu(&menu, bytes, content_type)
        .await
        .context("Failed to provision rich menu")?;

    println!("✅ Rich menu {} is now the default", id);
    Ok(())
}
