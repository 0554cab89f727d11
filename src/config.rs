use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Provider used for model-assisted extraction and transcription
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Page fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Grocery aggregation settings
    #[serde(default)]
    pub grocery: GroceryConfig,
}

/// Configuration for a specific model provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier used for recipe extraction
    pub model: String,
    /// Model identifier used for audio transcription
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Headers sent when fetching recipe pages
#[derive(Debug, Deserialize, Clone)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GroceryConfig {
    /// Category for ingredients with no linked master ingredient
    #[serde(default = "default_category")]
    pub default_category: String,
}

impl Default for GroceryConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

pub(crate) fn default_transcription_model() -> String {
    "gpt-4o-audio-preview".to_string()
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    4000
}

pub(crate) fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

pub(crate) fn default_accept_language() -> String {
    "en-US,en;q=0.9".to_string()
}

pub(crate) fn default_category() -> String {
    "other".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with MEALPLAN__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: MEALPLAN__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }
}

/// Load configuration from file and environment variables
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: MEALPLAN__GROCERY__DEFAULT_CATEGORY
        .add_source(
            Environment::with_prefix("MEALPLAN")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "openai");
        assert_eq!(default_category(), "other");
        assert!(default_user_agent().starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.default_provider, "openai");
        assert!(config.providers.is_empty());
        assert_eq!(config.grocery.default_category, "other");
        assert_eq!(config.fetch.accept_language, "en-US,en;q=0.9");
    }

    #[test]
    fn test_provider_section() {
        let config = from_toml(
            r#"
            default_provider = "anthropic"

            [providers.anthropic]
            enabled = true
            model = "claude-sonnet-4-5"
            api_key = "test-key"

            [grocery]
            default_category = "misc"
            "#,
        );

        let anthropic = config.providers.get("anthropic").unwrap();
        assert!(anthropic.enabled);
        assert_eq!(anthropic.model, "claude-sonnet-4-5");
        assert_eq!(anthropic.max_tokens, 4000);
        assert_eq!(anthropic.transcription_model, "gpt-4o-audio-preview");
        assert!(anthropic.base_url.is_none());
        assert_eq!(config.grocery.default_category, "misc");
    }
}
