use log::{debug, info};
use reqwest::Url;

use crate::audit::{LogSink, UrlCheck, UrlCheckSink};
use crate::config::{AppConfig, FetchConfig};
use crate::error::ImportError;
use crate::fetchers::RequestFetcher;
use crate::model::ImportedRecipe;
use crate::pipelines;
use crate::providers::{LlmProvider, ProviderFactory};
use crate::video::{video_id, VideoSource};

/// Builder for configuring a [`RecipeImporter`]
#[derive(Default)]
pub struct RecipeImporterBuilder {
    fetch: FetchConfig,
    provider: Option<Box<dyn LlmProvider>>,
    video_source: Option<Box<dyn VideoSource>>,
    audit_sink: Option<Box<dyn UrlCheckSink>>,
}

impl RecipeImporterBuilder {
    /// Set the headers used when fetching pages
    pub fn fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    /// Override the user agent sent with page fetches
    ///
    /// # Example
    /// ```
    /// use mealplan_core::RecipeImporter;
    ///
    /// let importer = RecipeImporter::builder()
    ///     .user_agent("MealPlanBot/1.0")
    ///     .build()
    ///     .unwrap();
    /// ```
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.fetch.user_agent = user_agent.into();
        self
    }

    /// Set the model provider used when a page has no structured markup and
    /// for video captions or audio. Without one, model extraction yields no
    /// recipes.
    pub fn provider(mut self, provider: impl LlmProvider + 'static) -> Self {
        self.provider = Some(Box::new(provider));
        self
    }

    pub fn boxed_provider(mut self, provider: Box<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the video collaborator. Without one, video URLs are imported like
    /// any other web page.
    pub fn video_source(mut self, source: impl VideoSource + 'static) -> Self {
        self.video_source = Some(Box::new(source));
        self
    }

    /// Set where per-URL check records go. Defaults to [`LogSink`].
    pub fn audit_sink(mut self, sink: impl UrlCheckSink + 'static) -> Self {
        self.audit_sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Result<RecipeImporter, ImportError> {
        let fetcher = RequestFetcher::new(&self.fetch)
            .map_err(|e| ImportError::BuilderError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(RecipeImporter {
            fetcher,
            provider: self.provider,
            video_source: self.video_source,
            audit_sink: self.audit_sink.unwrap_or_else(|| Box::new(LogSink)),
        })
    }
}

/// Turns a URL into zero or more structured recipes.
///
/// Web pages are read from embedded recipe markup when present and handed to
/// the model provider otherwise. Video URLs go through the linked-page,
/// captions and audio stages in that order.
pub struct RecipeImporter {
    pub(crate) fetcher: RequestFetcher,
    pub(crate) provider: Option<Box<dyn LlmProvider>>,
    pub(crate) video_source: Option<Box<dyn VideoSource>>,
    audit_sink: Box<dyn UrlCheckSink>,
}

impl RecipeImporter {
    /// Creates a new builder for importing recipes
    ///
    /// # Example
    /// ```
    /// use mealplan_core::RecipeImporter;
    ///
    /// let builder = RecipeImporter::builder();
    /// ```
    pub fn builder() -> RecipeImporterBuilder {
        RecipeImporterBuilder::default()
    }

    /// Build an importer from loaded configuration. A default provider that
    /// has no configuration section leaves the importer without a model.
    pub fn from_config(config: &AppConfig) -> Result<Self, ImportError> {
        let mut builder = Self::builder().fetch_config(config.fetch.clone());

        if config.providers.contains_key(&config.default_provider) {
            let provider = ProviderFactory::get_default_provider(config)
                .map_err(|e| ImportError::BuilderError(e.to_string()))?;
            builder = builder.boxed_provider(provider);
        } else {
            info!(
                "Provider '{}' is not configured; model extraction is disabled",
                config.default_provider
            );
        }

        builder.build()
    }

    /// Import every recipe found at `url`. An empty result means the source
    /// was reachable but held no recipe.
    ///
    /// # Example
    /// ```no_run
    /// # use mealplan_core::RecipeImporter;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let importer = RecipeImporter::builder().build()?;
    /// let recipes = importer.import_from_url("https://example.com/recipe").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn import_from_url(&self, url: &str) -> Result<Vec<ImportedRecipe>, ImportError> {
        let parsed = Url::parse(url).map_err(|e| ImportError::InvalidUrl(format!("{}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(ImportError::InvalidUrl(url.to_string()));
        }

        info!("Importing recipes from {}", url);
        match (video_id(url), self.video_source.as_deref()) {
            (Some(id), Some(source)) => pipelines::video::process(self, url, &id, source).await,
            (Some(_), None) => {
                debug!("No video source configured, treating {} as a web page", url);
                pipelines::url::process(self, url).await
            }
            (None, _) => pipelines::url::process(self, url).await,
        }
    }

    pub(crate) fn record(&self, check: UrlCheck) {
        self.audit_sink.record(check);
    }
}
