use std::fs;
use std::path::Path;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub text_muted: String,
    pub heading: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub selection_bg: String,
    pub locked: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    pub fn load(name: &str) -> Option<Self> {
        // Try user themes dir
        if let Some(config_dir) = dirs::config_dir()
            && let Some(theme) = Self::load_from_dir(&config_dir.join("biquest").join("themes"), name)
        {
            return Some(theme);
        }

        // Try bundled themes
        let file = ThemeAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    fn load_from_dir(dir: &Path, name: &str) -> Option<Self> {
        let content = fs::read_to_string(dir.join(format!("{name}.toml"))).ok()?;
        toml::from_str::<Theme>(&content).ok()
    }

    pub fn available_themes() -> Vec<String> {
        ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load("catppuccin-mocha").unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#1e1e2e".to_string(),
            fg: "#cdd6f4".to_string(),
            text_muted: "#7f849c".to_string(),
            heading: "#f9e2af".to_string(),
            accent: "#89b4fa".to_string(),
            accent_dim: "#45475a".to_string(),
            border: "#45475a".to_string(),
            border_focused: "#89b4fa".to_string(),
            header_bg: "#313244".to_string(),
            header_fg: "#cdd6f4".to_string(),
            bar_filled: "#89b4fa".to_string(),
            bar_empty: "#313244".to_string(),
            selection_bg: "#313244".to_string(),
            locked: "#585b70".to_string(),
            error: "#f38ba8".to_string(),
            warning: "#f9e2af".to_string(),
            success: "#a6e3a1".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6
            && let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            )
        {
            return Color::Rgb(r, g, b);
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn text_muted(&self) -> Color { Self::parse_color(&self.text_muted) }
    pub fn heading(&self) -> Color { Self::parse_color(&self.heading) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn selection_bg(&self) -> Color { Self::parse_color(&self.selection_bg) }
    pub fn locked(&self) -> Color { Self::parse_color(&self.locked) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_color() {
        assert_eq!(ThemeColors::parse_color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(ThemeColors::parse_color("#fff"), Color::White);
        assert_eq!(ThemeColors::parse_color("#zzzzzz"), Color::White);
    }

    #[test]
    fn test_bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&"catppuccin-mocha".to_string()));
        for name in names {
            assert!(Theme::load(&name).is_some(), "theme {name} failed to load");
        }
    }

    #[test]
    fn test_unknown_theme_is_none() {
        assert!(Theme::load("does-not-exist").is_none());
    }

    #[test]
    fn test_user_theme_dir() {
        let dir = TempDir::new().unwrap();
        let theme = Theme {
            name: "mine".to_string(),
            colors: ThemeColors::default(),
        };
        fs::write(dir.path().join("mine.toml"), toml::to_string(&theme).unwrap()).unwrap();
        let loaded = Theme::load_from_dir(dir.path(), "mine").unwrap();
        assert_eq!(loaded.name, "mine");
        assert!(Theme::load_from_dir(dir.path(), "other").is_none());
    }
}
