use crate::model::ImportedRecipe;
use log::debug;
use scraper::{Html, Selector};
use std::error::Error;

mod candidates;
mod json_ld;
mod microdata;
mod page_text;
mod schema;

pub use candidates::{parse_candidates, RecipeCandidate};
pub use json_ld::JsonLdExtractor;
pub use microdata::MicroDataExtractor;
pub use page_text::extract_visible_text;
pub use schema::site_name;

pub struct ParsingContext {
    pub url: String,
    pub document: Html,
}

/// A deterministic structured-markup extractor.
pub trait Extractor {
    fn name(&self) -> &str;
    fn parse(&self, context: &ParsingContext) -> Result<ImportedRecipe, Box<dyn Error + Send + Sync>>;
}

/// Map embedded recipe markup (JSON-LD first, then microdata) into a recipe.
/// `None` means the page carries no usable markup.
pub fn extract_structured(html: &str, url: &str) -> Option<ImportedRecipe> {
    let context = ParsingContext {
        url: url.to_string(),
        document: Html::parse_document(html),
    };

    let extractors: Vec<Box<dyn Extractor>> =
        vec![Box::new(JsonLdExtractor), Box::new(MicroDataExtractor)];

    for extractor in extractors {
        match extractor.parse(&context) {
            Ok(mut recipe) => {
                if recipe.cover_image_url.is_none() {
                    recipe.cover_image_url = og_image(&context.document);
                }
                debug!("Extracted recipe with {} extractor", extractor.name());
                return Some(recipe);
            }
            Err(e) => debug!("{} extractor: {}", extractor.name(), e),
        }
    }
    None
}

pub(crate) fn selector(css: &str) -> Result<Selector, Box<dyn Error + Send + Sync>> {
    Selector::parse(css).map_err(|e| format!("Invalid selector {css}: {e:?}").into())
}

fn og_image(document: &Html) -> Option<String> {
    let og = selector("meta[property='og:image']").ok()?;
    document
        .select(&og)
        .find_map(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
}
