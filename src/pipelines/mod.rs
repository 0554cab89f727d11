//! Import pipelines: the generic web page path and the staged video path.

pub(crate) mod url;
pub(crate) mod video;

use log::{debug, info};

use crate::builder::RecipeImporter;
use crate::error::{ImportError, ImportStage};
use crate::extractors::parse_candidates;
use crate::model::ImportedRecipe;
use crate::providers::ExtractionRequest;

/// Ask the configured provider for recipes and validate its answer. No
/// provider, or nothing to read, means no recipes.
pub(crate) async fn extract_with_model(
    importer: &RecipeImporter,
    url: &str,
    request: ExtractionRequest,
) -> Result<Vec<ImportedRecipe>, ImportError> {
    let Some(provider) = importer.provider.as_deref() else {
        debug!("No model provider configured, skipping model extraction for {}", url);
        return Ok(Vec::new());
    };
    if request.content.trim().is_empty() {
        debug!("No text to extract from at {}", url);
        return Ok(Vec::new());
    }

    info!(
        "Extracting recipes from {} with {} ({:?})",
        url,
        provider.provider_name(),
        request.kind
    );
    let raw = provider
        .extract_recipes(&request)
        .await
        .map_err(|e| ImportError::unavailable(url, ImportStage::ModelExtraction, e))?;

    let recipes = parse_candidates(&raw, Some(url));
    debug!("Model returned {} valid recipe(s) for {}", recipes.len(), url);
    Ok(recipes)
}
