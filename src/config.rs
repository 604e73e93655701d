//! Panel settings: image strategy, image host and chat endpoint

use crate::paths::get_settings_path;
use crate::strategy::{EmbedStrategy, HostedStrategy, ImageResolutionStrategy, StrategyKind};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_UPLOAD_URL: &str = "https://api.cloudinary.com/v1_1/demo/image/upload";
pub const DEFAULT_UPLOAD_PRESET: &str = "docs_upload_example_us_preset";

/// Overrides `chat.api_key` from the settings file
pub const CHAT_API_KEY_ENV: &str = "FAREAPP_CHAT_API_KEY";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ImageHostConfig {
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
    #[serde(default = "default_upload_preset")]
    pub upload_preset: String,
}

fn default_upload_url() -> String {
    DEFAULT_UPLOAD_URL.to_string()
}

fn default_upload_preset() -> String {
    DEFAULT_UPLOAD_PRESET.to_string()
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            upload_url: default_upload_url(),
            upload_preset: default_upload_preset(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChatConfig {
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_chat_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_api_base() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_chat_model() -> String {
    "google/gemini-2.0-flash-001".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_chat_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
        }
    }
}

impl ChatConfig {
    /// Key to call the endpoint with: the environment first, then the file.
    pub fn effective_api_key(&self) -> Option<String> {
        self.api_key_with(std::env::var(CHAT_API_KEY_ENV).ok().as_deref())
    }

    /// Same as [`effective_api_key`](Self::effective_api_key) with the
    /// environment value passed in.
    pub fn api_key_with(&self, from_env: Option<&str>) -> Option<String> {
        usable_key(from_env).or_else(|| usable_key(self.api_key.as_deref()))
    }
}

/// Blank keys and the literal `undefined` (what a build leaves behind when the
/// variable was never injected) count as missing.
pub fn usable_key(raw: Option<&str>) -> Option<String> {
    let key = raw?.trim();
    if key.is_empty() || key == "undefined" {
        None
    } else {
        Some(key.to_string())
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PanelSettings {
    #[serde(default)]
    pub image_strategy: StrategyKind,
    #[serde(default)]
    pub image_host: ImageHostConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    /// How long the "saved" acknowledgment stays visible
    #[serde(default = "default_saved_ack_ms")]
    pub saved_ack_ms: u64,
}

fn default_saved_ack_ms() -> u64 {
    2000
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            image_strategy: StrategyKind::default(),
            image_host: ImageHostConfig::default(),
            chat: ChatConfig::default(),
            saved_ack_ms: default_saved_ack_ms(),
        }
    }
}

impl PanelSettings {
    /// Settings from the app data directory, or defaults
    pub fn load() -> Self {
        match get_settings_path() {
            Ok(path) => Self::load_from(&path),
            Err(e) => {
                warn!("[config] {}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Settings from `path`. A missing file gives the defaults; an unreadable
    /// or malformed one does too, with a warning.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("[config] Failed to read {}: {}", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => {
                info!("[config] Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                warn!("[config] Failed to parse {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create directory: {}", e))?;
        }
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to save settings: {}", e))
    }

    pub fn saved_ack(&self) -> Duration {
        Duration::from_millis(self.saved_ack_ms)
    }

    /// The image strategy this deployment runs with
    pub fn build_strategy(&self) -> Arc<dyn ImageResolutionStrategy> {
        match self.image_strategy {
            StrategyKind::Embed => Arc::new(EmbedStrategy),
            StrategyKind::Hosted => Arc::new(HostedStrategy::new(
                self.image_host.upload_url.clone(),
                self.image_host.upload_preset.clone(),
            )),
        }
    }
}
