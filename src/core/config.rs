//! Application configuration management

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use super::autosave::DEFAULT_DEBOUNCE;
use super::share::DEFAULT_TOAST_DURATION;

/// Environment variable overriding the document store URL
pub const API_URL_ENV: &str = "CODESHARE_API_URL";
/// Environment variable overriding the base of share links
pub const SHARE_URL_ENV: &str = "CODESHARE_SHARE_URL";

const MAX_RECENT_DOCUMENTS: usize = 10;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document store settings
    pub store: StoreConfig,
    /// Editor settings
    pub editor: EditorConfig,
    /// UI settings
    pub ui: UiConfig,
    /// Recently opened document ids, newest first
    pub recent_documents: Vec<String>,
    /// Environment / command line overrides, never written to disk
    #[serde(skip)]
    pub overrides: StoreOverrides,
}

/// Store URLs given on the command line or in the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreOverrides {
    pub api_base_url: Option<String>,
    pub share_base_url: Option<String>,
}

/// Where documents live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Base URL of the document store API
    pub api_base_url: String,
    /// Base URL share links point at (falls back to the API URL)
    pub share_base_url: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Editor-specific settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Font size in points
    pub font_size: f32,
    /// Spaces inserted by Tab
    pub tab_size: usize,
    /// Word wrap
    pub word_wrap: bool,
    /// Quiet period before an edit is saved, in milliseconds
    pub autosave_debounce_ms: u64,
    /// Show line numbers
    pub show_line_numbers: bool,
    /// Rows the line-number gutter always shows
    pub min_gutter_lines: usize,
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Theme (light/dark)
    pub theme: String,
    /// How long the "Link copied!" toast stays up, in milliseconds
    pub toast_duration_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            share_base_url: None,
            request_timeout_secs: 10,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            tab_size: 4,
            word_wrap: false,
            autosave_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            show_line_numbers: true,
            min_gutter_lines: 20,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            toast_duration_ms: DEFAULT_TOAST_DURATION.as_millis() as u64,
        }
    }
}

impl StoreConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl EditorConfig {
    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }
}

impl UiConfig {
    pub fn toast_duration(&self) -> Duration {
        Duration::from_millis(self.toast_duration_ms)
    }
}

impl AppConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "codeshare", "Codeshare")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::load_from(&path)
    }

    /// Load configuration from a specific file, defaults if it is missing
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        self.save_to(&path)
    }

    /// Save configuration to a specific file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure config directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Apply `CODESHARE_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(API_URL_ENV).ok(),
            std::env::var(SHARE_URL_ENV).ok(),
        );
    }

    /// Override store URLs for this run; empty values are ignored
    pub fn apply_overrides(&mut self, api_url: Option<String>, share_url: Option<String>) {
        let clean = |url: String| {
            let url = url.trim().to_string();
            (!url.is_empty()).then_some(url)
        };
        if let Some(url) = api_url.and_then(clean) {
            self.overrides.api_base_url = Some(url);
        }
        if let Some(url) = share_url.and_then(clean) {
            self.overrides.share_base_url = Some(url);
        }
    }

    /// Base URL of the document store API
    pub fn api_base(&self) -> &str {
        self.overrides
            .api_base_url
            .as_deref()
            .unwrap_or(&self.store.api_base_url)
    }

    /// Base URL share links are built from
    pub fn share_base(&self) -> &str {
        self.overrides
            .share_base_url
            .as_deref()
            .or(self.store.share_base_url.as_deref())
            .unwrap_or_else(|| self.api_base())
    }

    /// Add a document to recent documents
    pub fn add_recent_document(&mut self, id: &str) {
        // Remove if already exists
        self.recent_documents.retain(|d| d != id);
        // Add to front
        self.recent_documents.insert(0, id.to_string());
        self.recent_documents.truncate(MAX_RECENT_DOCUMENTS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.api_base_url, "http://localhost:3000");
        assert_eq!(config.editor.autosave_debounce(), Duration::from_millis(700));
        assert_eq!(config.editor.tab_size, 4);
        assert_eq!(config.editor.min_gutter_lines, 20);
        assert_eq!(config.ui.toast_duration(), Duration::from_millis(2000));
    }

    #[test]
    fn test_share_base_falls_back_to_api() {
        let mut config = AppConfig::default();
        assert_eq!(config.share_base(), "http://localhost:3000");

        config.apply_overrides(None, Some("https://share.dev".into()));
        assert_eq!(config.share_base(), "https://share.dev");
    }

    #[test]
    fn test_overrides_skip_empty_values() {
        let mut config = AppConfig::default();
        config.apply_overrides(Some("  ".into()), Some(String::new()));
        assert_eq!(config.overrides, StoreOverrides::default());
        assert_eq!(config.api_base(), "http://localhost:3000");

        config.apply_overrides(Some("https://api.share.dev ".into()), None);
        assert_eq!(config.api_base(), "https://api.share.dev");
        assert_eq!(config.share_base(), "https://api.share.dev");
    }

    #[test]
    fn test_overrides_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.store.share_base_url = Some("https://from-file.dev".into());
        config.apply_overrides(Some("https://api.override.dev".into()), None);
        assert_eq!(config.share_base(), "https://from-file.dev");
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.api_base(), "http://localhost:3000");
        assert_eq!(loaded.share_base(), "https://from-file.dev");
    }

    #[test]
    fn test_recent_documents() {
        let mut config = AppConfig::default();
        for i in 0..12 {
            config.add_recent_document(&format!("doc{}", i));
        }
        config.add_recent_document("doc5");

        assert_eq!(config.recent_documents.len(), MAX_RECENT_DOCUMENTS);
        assert_eq!(config.recent_documents[0], "doc5");
        assert_eq!(config.recent_documents[1], "doc11");
        assert_eq!(config.recent_documents.iter().filter(|d| *d == "doc5").count(), 1);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.editor.word_wrap = true;
        config.add_recent_document("abcd1234");
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert!(loaded.editor.word_wrap);
        assert_eq!(loaded.recent_documents, vec!["abcd1234".to_string()]);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"editor": {"tab_size": 2}}"#).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.editor.tab_size, 2);
        assert_eq!(loaded.editor.autosave_debounce_ms, 700);
        assert_eq!(loaded.store.api_base_url, "http://localhost:3000");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert!(loaded.recent_documents.is_empty());
    }
}
