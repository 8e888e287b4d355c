//! Rich menu provisioning
//!
//! The bot ships one rich menu with three buttons that send the summary and
//! health chat commands. Provisioning replaces any earlier menu with the
//! same name, uploads the image and makes the new menu the default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::LineClient;
use crate::error::{Error, Result};

pub const RICH_MENU_NAME: &str = "lung-nan-main-menu";

const MENU_WIDTH: u32 = 2500;
const MENU_HEIGHT: u32 = 843;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichMenu {
    pub size: RichMenuSize,
    pub selected: bool,
    pub name: String,
    pub chat_bar_text: String,
    pub areas: Vec<RichMenuArea>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichMenuSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichMenuArea {
    pub bounds: RichMenuBounds,
    pub action: RichMenuAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichMenuBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Tapping the area sends `text` as if the user typed it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichMenuAction {
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub text: String,
}

/// Menu as returned by the list endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichMenuInfo {
    pub rich_menu_id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct RichMenuList {
    #[serde(default)]
    richmenus: Vec<RichMenuInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedRichMenu {
    rich_menu_id: String,
}

/// Three equal columns: today's summary, this month's summary, health
pub fn default_rich_menu() -> RichMenu {
    let buttons = [
        (0, 833, "Today", "summary today"),
        (833, 834, "This month", "summary month"),
        (1667, 833, "Health", "financial health"),
    ];

    RichMenu {
        size: RichMenuSize {
            width: MENU_WIDTH,
            height: MENU_HEIGHT,
        },
        selected: true,
        name: RICH_MENU_NAME.to_string(),
        chat_bar_text: "Lung Nan menu".to_string(),
        areas: buttons
            .iter()
            .map(|&(x, width, label, text)| RichMenuArea {
                bounds: RichMenuBounds {
                    x,
                    y: 0,
                    width,
                    height: MENU_HEIGHT,
                },
                action: RichMenuAction {
                    kind: "message".to_string(),
                    label: label.to_string(),
                    text: text.to_string(),
                },
            })
            .collect(),
    }
}

/// MIME type LINE expects for a rich menu image file
pub fn image_content_type(path: &Path) -> Result<&'static str> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("png") => Ok("image/png"),
        Some("jpg") | Some("jpeg") => Ok("image/jpeg"),
        _ => Err(Error::InvalidData(format!(
            "Unsupported rich menu image {}: use .png, .jpg or .jpeg",
            path.display()
        ))),
    }
}

impl LineClient {
    pub async fn list_rich_menus(&self) -> Result<Vec<RichMenuInfo>> {
        let response = self
            .http_client
            .get(format!("{}/v2/bot/richmenu/list", self.api_base))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .send()
            .await?;
        let list: RichMenuList = Self::check(response, "list rich menus").await?.json().await?;
        Ok(list.richmenus)
    }

    pub async fn delete_rich_menu(&self, rich_menu_id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(format!("{}/v2/bot/richmenu/{}", self.api_base, rich_menu_id))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .send()
            .await?;
        Self::check(response, "delete rich menu").await?;
        Ok(())
    }

    /// Create a menu and return its id
    pub async fn create_rich_menu(&self, menu: &RichMenu) -> Result<String> {
        let response = self
            .http_client
            .post(format!("{}/v2/bot/richmenu", self.api_base))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .json(menu)
            .send()
            .await?;
        let created: CreatedRichMenu = Self::check(response, "create rich menu").await?.json().await?;
        Ok(created.rich_menu_id)
    }

    pub async fn upload_rich_menu_image(
        &self,
        rich_menu_id: &str,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        let response = self
            .http_client
            .post(format!(
                "{}/v2/bot/richmenu/{}/content",
                self.data_api_base, rich_menu_id
            ))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image)
            .send()
            .await?;
        Self::check(response, "upload rich menu image").await?;
        Ok(())
    }

    pub async fn set_default_rich_menu(&self, rich_menu_id: &str) -> Result<()> {
        let response = self
            .http_client
            .post(format!(
                "{}/v2/bot/user/all/richmenu/{}",
                self.api_base, rich_menu_id
            ))
            .header(reqwest::header::AUTHORIZATION, self.bearer())
            .send()
            .await?;
        Self::check(response, "set default rich menu").await?;
        Ok(())
    }

    /// Replace same-named menus with `menu`, upload its image and make it default
    ///
    /// `content_type` comes from [`image_content_type`]. Returns the new menu id.
    pub async fn provision_rich_menu(
        &self,
        menu: &RichMenu,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        for existing in self.list_rich_menus().await? {
            if existing.name == menu.name {
                info!(id = %existing.rich_menu_id, "Deleting previous rich menu");
                self.delete_rich_menu(&existing.rich_menu_id).await?;
            }
        }

        let id = self.create_rich_menu(menu).await?;
        self.upload_rich_menu_image(&id, image, content_type).await?;
        self.set_default_rich_menu(&id).await?;

        info!(id = %id, name = %menu.name, "Rich menu provisioned");
        Ok(id)
    }
}
