mod anthropic;
mod factory;
mod open_ai;
mod prompt;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use open_ai::OpenAIProvider;
pub use prompt::{ExtractionRequest, SourceKind, RECIPE_EXTRACTION_PROMPT, TRANSCRIPTION_PROMPT};

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for model-inference providers
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Ask the model for recipes found in the request content. Returns the raw,
    /// untrusted response text.
    async fn extract_recipes(
        &self,
        request: &ExtractionRequest,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;

    /// Transcribe raw audio (`format` is e.g. "mp3" or "wav").
    async fn transcribe(
        &self,
        audio: &[u8],
        format: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}
