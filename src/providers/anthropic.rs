use crate::config::ProviderConfig;
use crate::providers::{ExtractionRequest, LlmProvider, RECIPE_EXTRACTION_PROMPT};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";

pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
            .ok_or("ANTHROPIC_API_KEY not found in config or environment")?;

        Ok(AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        AnthropicProvider {
            client: Client::new(),
            api_key,
            base_url,
            model,
            temperature: 0.2,
            max_tokens: 4000,
        }
    }
}

#[async_trait]
impl LlmProvider for AnthropicProvider {
    fn provider_name(&self) -> &str {
        "anthropic"
    }

    async fn extract_recipes(
        &self,
        request: &ExtractionRequest,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&json!({
                "model": self.model,
                "max_tokens": self.max_tokens,
                "temperature": self.temperature,
                "system": RECIPE_EXTRACTION_PROMPT,
                "messages": [
                    {
                        "role": "user",
                        "content": request.user_message()
                    }
                ]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Anthropic request failed with status: {}", status).into());
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let content = response_body["content"][0]["text"]
            .as_str()
            .ok_or("Failed to extract content from Anthropic response")?
            .to_string();

        Ok(content)
    }

    async fn transcribe(
        &self,
        _audio: &[u8],
        _format: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        Err("Anthropic provider does not support audio transcription".into())
    }
}
