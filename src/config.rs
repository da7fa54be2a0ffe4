use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;
use tracing::warn;

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_text_model")]
    pub text_model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Minimum quiz percentage that counts as a pass.
    #[serde(default = "default_passing_score")]
    pub passing_score: u32,
    #[serde(default = "default_content_language")]
    pub content_language: String,
    #[serde(default = "default_generate_images")]
    pub generate_images: bool,
}

fn default_theme() -> String {
    "catppuccin-mocha".to_string()
}
fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_text_model() -> String {
    "gemini-2.5-flash".to_string()
}
fn default_image_model() -> String {
    "imagen-3.0-generate-002".to_string()
}
fn default_request_timeout_secs() -> u64 {
    90
}
fn default_passing_score() -> u32 {
    70
}
fn default_content_language() -> String {
    "English".to_string()
}
fn default_generate_images() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            api_base_url: default_api_base_url(),
            text_model: default_text_model(),
            image_model: default_image_model(),
            request_timeout_secs: default_request_timeout_secs(),
            passing_score: default_passing_score(),
            content_language: default_content_language(),
            generate_images: default_generate_images(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("biquest")
            .join("config.toml")
    }

    /// Pull out-of-range values back to something usable. Call after
    /// deserialization and after applying CLI overrides.
    pub fn validate(&mut self) {
        if self.passing_score > 100 {
            warn!(value = self.passing_score, "passing_score above 100, clamping");
            self.passing_score = 100;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = default_request_timeout_secs();
        }
        if self.api_base_url.trim().is_empty() {
            self.api_base_url = default_api_base_url();
        }
        if self.text_model.trim().is_empty() {
            self.text_model = default_text_model();
        }
        if self.image_model.trim().is_empty() {
            self.image_model = default_image_model();
        }
        if self.content_language.trim().is_empty() {
            self.content_language = default_content_language();
        }
    }
}
