use log::debug;

use crate::audit::UrlCheck;
use crate::builder::RecipeImporter;
use crate::error::{ImportError, ImportStage};
use crate::extractors::{extract_structured, extract_visible_text};
use crate::model::ImportedRecipe;
use crate::providers::{ExtractionRequest, SourceKind};

/// Import a generic web page.
///
/// This pipeline:
/// 1. Fetches the HTML with browser-like headers
/// 2. Maps embedded recipe markup (JSON-LD, then microdata) into one recipe
/// 3. Otherwise sends the page's visible text to the model provider
///
/// The outcome is recorded with the importer's audit sink.
pub(crate) async fn process(
    importer: &RecipeImporter,
    url: &str,
) -> Result<Vec<ImportedRecipe>, ImportError> {
    let result = import_page(importer, url).await;
    match &result {
        Ok(recipes) => importer.record(UrlCheck::found(url, !recipes.is_empty())),
        Err(e) => importer.record(UrlCheck::failed(url, e)),
    }
    result
}

async fn import_page(
    importer: &RecipeImporter,
    url: &str,
) -> Result<Vec<ImportedRecipe>, ImportError> {
    let html = importer
        .fetcher
        .fetch(url)
        .await
        .map_err(|e| ImportError::unavailable(url, ImportStage::Fetch, e))?;

    if let Some(recipe) = extract_structured(&html, url) {
        return Ok(vec![recipe]);
    }

    debug!("No recipe markup at {}, falling back to page text", url);
    let text = extract_visible_text(&html);
    super::extract_with_model(importer, url, ExtractionRequest::new(text, SourceKind::WebPage)).await
}
