use crate::config::{AppConfig, ProviderConfig};
use crate::providers::{AnthropicProvider, LlmProvider, OpenAIProvider};
use std::error::Error;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Box<dyn LlmProvider>, Box<dyn Error + Send + Sync>> {
        if !config.enabled {
            return Err(format!(
                "Provider '{}' is not enabled in configuration",
                provider_name
            )
            .into());
        }

        match provider_name {
            "openai" => Ok(Box::new(OpenAIProvider::new(config)?)),
            "anthropic" => Ok(Box::new(AnthropicProvider::new(config)?)),
            _ => Err(format!("Unknown provider: {}", provider_name).into()),
        }
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(
        config: &AppConfig,
    ) -> Result<Box<dyn LlmProvider>, Box<dyn Error + Send + Sync>> {
        let provider_name = &config.default_provider;
        let provider_config = config.providers.get(provider_name).ok_or_else(|| {
            format!(
                "Default provider '{}' not found in configuration",
                provider_name
            )
        })?;

        Self::create(provider_name, provider_config)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["openai", "anthropic"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn create_test_provider_config() -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "test-model".to_string(),
            transcription_model: "test-audio-model".to_string(),
            temperature: 0.2,
            max_tokens: 2000,
            api_key: Some("test-key".to_string()),
            base_url: None,
        }
    }

    fn app_config(providers: HashMap<String, ProviderConfig>) -> AppConfig {
        AppConfig {
            default_provider: "openai".to_string(),
            providers,
            fetch: Default::default(),
            grocery: Default::default(),
        }
    }

    #[test]
    fn test_create_openai_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("openai", &config).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_create_anthropic_provider() {
        let config = create_test_provider_config();
        let provider = ProviderFactory::create("anthropic", &config).unwrap();
        assert_eq!(provider.provider_name(), "anthropic");
    }

    #[test]
    fn test_create_unknown_provider() {
        let config = create_test_provider_config();
        let result = ProviderFactory::create("unknown", &config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("Unknown provider"));
        }
    }

    #[test]
    fn test_create_disabled_provider() {
        let mut config = create_test_provider_config();
        config.enabled = false;

        let result = ProviderFactory::create("openai", &config);
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not enabled in configuration"));
        }
    }

    #[test]
    fn test_get_default_provider() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), create_test_provider_config());

        let provider = ProviderFactory::get_default_provider(&app_config(providers)).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }

    #[test]
    fn test_get_default_provider_not_found() {
        let result = ProviderFactory::get_default_provider(&app_config(HashMap::new()));
        assert!(result.is_err());
        if let Err(e) = result {
            assert!(e.to_string().contains("not found"));
        }
    }

    #[test]
    fn test_available_providers() {
        let providers = ProviderFactory::available_providers();
        assert_eq!(providers, vec!["openai", "anthropic"]);
    }
}
