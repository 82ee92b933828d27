//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable selecting development or production behaviour
pub const ENV_MODE: &str = "FOLIO_ENV";

/// Environment variable forcing the built-in sample posts
pub const ENV_MOCK_DATA: &str = "FOLIO_MOCK_DATA";

/// How the post repository reacts to a missing or empty content directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Only what is on disk; missing content yields an empty blog
    #[default]
    Strict,
    /// Write the sample posts to disk when content is missing, fall back to stubs
    #[serde(rename = "development", alias = "dev")]
    DevWithFallback,
    /// Always serve the built-in sample metadata
    #[serde(rename = "mock")]
    MockOnly,
}

impl ContentMode {
    /// Development-capable modes may bootstrap sample content
    pub fn is_development(self) -> bool {
        matches!(self, ContentMode::DevWithFallback | ContentMode::MockOnly)
    }

    /// Resolve the mode from the two environment flags.
    /// Returns `None` when neither flag says anything.
    pub fn from_env_values(env: Option<&str>, mock: Option<&str>) -> Option<Self> {
        let mock = mock
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if mock {
            return Some(ContentMode::MockOnly);
        }

        match env.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "development" || v == "dev" => Some(ContentMode::DevWithFallback),
            Some(v) if v == "production" || v == "prod" => Some(ContentMode::Strict),
            _ => None,
        }
    }
}

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,

    // Content
    pub content_dir: String,
    pub mode: ContentMode,

    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            description: String::new(),
            author: "Anonymous".to_string(),
            url: "http://localhost:4000".to_string(),
            content_dir: "blogs".to_string(),
            mode: ContentMode::Strict,
            server: ServerConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Apply `FOLIO_ENV` / `FOLIO_MOCK_DATA` on top of the file settings
    pub fn apply_env(&mut self) {
        let env = std::env::var(ENV_MODE).ok();
        let mock = std::env::var(ENV_MOCK_DATA).ok();
        if let Some(mode) = ContentMode::from_env_values(env.as_deref(), mock.as_deref()) {
            tracing::debug!("Content mode {:?} selected from environment", mode);
            self.mode = mode;
        }
    }
}

/// Development server defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 4000,
        }
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_partial_yaml() {
        let config: SiteConfig = serde_yaml::from_str("title: My Blog\nmode: development\n").unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.mode, ContentMode::DevWithFallback);
        assert_eq!(config.content_dir, "blogs");
        assert_eq!(config.server.port, 4000);
    }

    #[test]
    fn test_mode_from_env_values() {
        assert_eq!(ContentMode::from_env_values(None, None), None);
        assert_eq!(
            ContentMode::from_env_values(Some("development"), None),
            Some(ContentMode::DevWithFallback)
        );
        assert_eq!(
            ContentMode::from_env_values(Some("production"), Some("false")),
            Some(ContentMode::Strict)
        );
        // mock flag wins over the environment name
        assert_eq!(
            ContentMode::from_env_values(Some("production"), Some("true")),
            Some(ContentMode::MockOnly)
        );
        assert_eq!(ContentMode::from_env_values(Some("staging"), None), None);
    }

    #[test]
    fn test_development_capable_modes() {
        assert!(!ContentMode::Strict.is_development());
        assert!(ContentMode::DevWithFallback.is_development());
        assert!(ContentMode::MockOnly.is_development());
    }
}
