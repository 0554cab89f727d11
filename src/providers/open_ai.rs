use crate::config::ProviderConfig;
use crate::providers::{ExtractionRequest, LlmProvider, RECIPE_EXTRACTION_PROMPT, TRANSCRIPTION_PROMPT};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::error::Error;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    transcription_model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or("OPENAI_API_KEY not found in config or environment")?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        Ok(OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            transcription_model: config.transcription_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    #[doc(hidden)]
    pub fn with_base_url(api_key: String, base_url: String, model: String) -> Self {
        OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            transcription_model: crate::config::default_transcription_model(),
            model,
            temperature: 0.2,
            max_tokens: 4000,
        }
    }

    async fn chat(&self, body: Value) -> Result<String, Box<dyn Error + Send + Sync>> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("OpenAI request failed with status: {}", status).into());
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);
        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or("Failed to extract content from response")?
            .to_string();

        Ok(content)
    }
}

#[async_trait]
impl LlmProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn extract_recipes(
        &self,
        request: &ExtractionRequest,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.chat(json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": RECIPE_EXTRACTION_PROMPT},
                {"role": "user", "content": request.user_message()}
            ],
            "response_format": {"type": "json_object"},
            "temperature": self.temperature,
            "max_tokens": self.max_tokens
        }))
        .await
    }

    async fn transcribe(
        &self,
        audio: &[u8],
        format: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        debug!("Transcribing {} bytes of {} audio", audio.len(), format);
        self.chat(json!({
            "model": self.transcription_model,
            "modalities": ["text"],
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": TRANSCRIPTION_PROMPT},
                    {"type": "input_audio", "input_audio": {"data": STANDARD.encode(audio), "format": format}}
                ]
            }]
        }))
        .await
    }
}
