//! Recipe import, ingredient parsing and grocery list aggregation for a
//! household meal planner.
//!
//! - [`parse_line`] turns one free-text ingredient line into structured fields.
//! - [`RecipeImporter`] turns a web page or video URL into recipes, using
//!   embedded recipe markup when present and a model provider otherwise.
//! - [`grocery::generate`] scales, aggregates and merges planned recipes into a
//!   grocery list.

pub mod audit;
pub mod builder;
pub mod config;
pub mod error;
pub mod extractors;
pub mod fetchers;
pub mod grocery;
pub mod ingredients;
pub mod model;
mod pipelines;
pub mod providers;
pub mod video;

pub use audit::{LogSink, UrlCheck, UrlCheckSink};
pub use builder::{RecipeImporter, RecipeImporterBuilder};
pub use config::AppConfig;
pub use error::{GroceryError, ImportError, ImportStage};
pub use ingredients::{canonical_unit, normalize_name, normalize_unit, parse_line, ParsedIngredientLine};
pub use model::{Difficulty, ImportedIngredient, ImportedInstruction, ImportedRecipe};

/// Import recipes from a URL using configuration from `config.toml` and
/// `MEALPLAN__` environment variables.
///
/// # Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let recipes = mealplan_core::import_from_url("https://example.com/recipe").await?;
/// for recipe in recipes {
///     println!("{}", recipe.title);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn import_from_url(url: &str) -> Result<Vec<ImportedRecipe>, ImportError> {
    let config = AppConfig::load()?;
    RecipeImporter::from_config(&config)?.import_from_url(url).await
}
