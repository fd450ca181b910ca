use anyhow::{anyhow, bail, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::responses::WELCOME_MESSAGE;
use crate::timing::TypingDelay;

pub const DEFAULT_BOT_NAME: &str = "Assistant";
pub const TYPING_DELAY_MIN_MS: u64 = 700;
pub const TYPING_DELAY_MAX_MS: u64 = 900;

/// Corner of the host page the floating button is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    BottomRight,
    BottomLeft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetConfig {
    pub bot_name: String,
    pub welcome_message: String,
    pub primary_color: Option<String>,
    pub position: Position,
    pub typing_delay_min_ms: u64,
    pub typing_delay_max_ms: u64,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        WidgetConfig {
            bot_name: DEFAULT_BOT_NAME.to_string(),
            welcome_message: WELCOME_MESSAGE.to_string(),
            primary_color: None,
            position: Position::default(),
            typing_delay_min_ms: TYPING_DELAY_MIN_MS,
            typing_delay_max_ms: TYPING_DELAY_MAX_MS,
        }
    }
}

impl WidgetConfig {
    /// Parse a host-supplied JSON object. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: WidgetConfig =
            serde_json::from_str(raw).context("widget configuration is not valid JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bot_name.trim().is_empty() {
            bail!("botName must not be empty");
        }

        if self.typing_delay_min_ms > self.typing_delay_max_ms {
            return Err(anyhow!(
                "typing delay minimum ({}ms) exceeds maximum ({}ms)",
                self.typing_delay_min_ms,
                self.typing_delay_max_ms
            ));
        }

        if let Some(color) = &self.primary_color {
            let hex_color = Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap();
            if !hex_color.is_match(color) {
                bail!("primaryColor must be a #rgb or #rrggbb hex colour, got {:?}", color);
            }
        }

        Ok(())
    }

    pub fn typing_delay(&self) -> TypingDelay {
        TypingDelay::new(
            Duration::from_millis(self.typing_delay_min_ms),
            Duration::from_millis(self.typing_delay_max_ms),
        )
    }
}
