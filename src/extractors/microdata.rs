use super::schema::{
    clean_text, fill_from_total, parse_duration_minutes, push_tags, site_name, RecipeYield,
};
use super::{selector, Extractor, ParsingContext};
use crate::ingredients::parse_line;
use crate::model::{number_steps, ImportedIngredient, ImportedRecipe};
use log::debug;
use scraper::{ElementRef, Html};
use std::error::Error;

pub struct MicroDataExtractor;

impl MicroDataExtractor {
    fn find_recipe_container<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let itemscope = selector("[itemscope]").ok()?;
        document.select(&itemscope).find(|element| {
            element.value().attr("itemtype").is_some_and(|itemtype| {
                itemtype.contains("schema.org/Recipe") || itemtype.contains("data-vocabulary.org/Recipe")
            })
        })
    }

    /// `content` or `datetime` attribute when present (meta tags, durations),
    /// then `src` for images, else text.
    fn element_value(&self, element: ElementRef) -> String {
        if let Some(content) = element.value().attr("content") {
            return clean_text(content);
        }
        if let Some(datetime) = element.value().attr("datetime") {
            return datetime.trim().to_string();
        }
        if let Some(src) = element.value().attr("src") {
            return src.trim().to_string();
        }
        clean_text(&element.text().collect::<Vec<_>>().join(" "))
    }

    fn get_itemprop(&self, root: ElementRef, prop: &str) -> Option<String> {
        let prop_selector = selector(&format!("[itemprop='{}']", prop)).ok()?;
        root.select(&prop_selector)
            .map(|el| self.element_value(el))
            .find(|value| !value.is_empty())
    }

    /// Every matching element in document order, blank ones included.
    fn get_itemprop_list(&self, root: ElementRef, prop: &str) -> Vec<String> {
        let Ok(prop_selector) = selector(&format!("[itemprop='{}']", prop)) else {
            return Vec::new();
        };
        root.select(&prop_selector)
            .map(|el| self.element_value(el))
            .collect()
    }
}

impl Extractor for MicroDataExtractor {
    fn name(&self) -> &str {
        "microdata"
    }

    fn parse(&self, context: &ParsingContext) -> Result<ImportedRecipe, Box<dyn Error + Send + Sync>> {
        debug!("Attempting to extract recipe using MicroData extractor");

        // Global itemprop searches pick up unrelated page content, so only a
        // Recipe-typed container counts.
        let container = self
            .find_recipe_container(&context.document)
            .ok_or("No MicroData Recipe container found")?;

        let title = self
            .get_itemprop(container, "name")
            .ok_or("Could not extract recipe name")?;

        let blank = |lines: &[String]| lines.iter().all(|line| line.is_empty());
        let mut ingredient_lines = self.get_itemprop_list(container, "recipeIngredient");
        if blank(&ingredient_lines) {
            ingredient_lines = self.get_itemprop_list(container, "ingredients");
        }
        let mut instruction_lines = self.get_itemprop_list(container, "recipeInstructions");
        if blank(&instruction_lines) {
            instruction_lines = self.get_itemprop_list(container, "instructions");
        }
        if blank(&ingredient_lines) && blank(&instruction_lines) {
            return Err("Could not extract recipe content".into());
        }

        // One ingredient per element, headers and blanks included.
        let ingredients = ingredient_lines
            .iter()
            .map(|line| ImportedIngredient::from(parse_line(line)))
            .collect();
        let instructions = number_steps(instruction_lines.into_iter().map(|line| (None, line)));

        let yield_amount = self
            .get_itemprop(container, "recipeYield")
            .and_then(|y| RecipeYield::Text(y).normalize());

        let author_selector = selector("[itemprop='author']")?;
        let author = container.select(&author_selector).next().and_then(|author_el| {
            self.get_itemprop(author_el, "name")
                .or_else(|| Some(self.element_value(author_el)))
                .filter(|name| !name.is_empty())
        });

        let mut tags = Vec::new();
        for prop in ["keywords", "recipeCategory", "recipeCuisine"] {
            for value in self.get_itemprop_list(container, prop) {
                push_tags(&mut tags, &value);
            }
        }

        let duration = |prop: &str| {
            self.get_itemprop(container, prop)
                .and_then(|t| parse_duration_minutes(&t))
        };
        let (prep_minutes, cook_minutes) =
            fill_from_total(duration("prepTime"), duration("cookTime"), duration("totalTime"));

        Ok(ImportedRecipe {
            title,
            description: self.get_itemprop(container, "description"),
            ingredients,
            instructions,
            yield_quantity: yield_amount.as_ref().map(|y| y.quantity),
            yield_unit: yield_amount.and_then(|y| y.unit),
            prep_minutes,
            cook_minutes,
            difficulty: None,
            source_url: Some(context.url.clone()),
            source_name: site_name(&context.url),
            author,
            cover_image_url: self.get_itemprop(container, "image"),
            tags,
            video_start_seconds: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_microdata_recipe() {
        let html = r#"
            <html><body>
            <div itemscope itemtype="https://schema.org/Recipe">
                <h1 itemprop="name">Banana Bread</h1>
                <img itemprop="image" src="https://example.com/bread.jpg">
                <span itemprop="author" itemscope itemtype="https://schema.org/Person">
                    <span itemprop="name">Ann Baker</span>
                </span>
                <meta itemprop="prepTime" content="PT10M">
                <meta itemprop="cookTime" content="PT1H">
                <span itemprop="recipeYield">1 loaf</span>
                <ul>
                    <li itemprop="recipeIngredient">3 ripe bananas, mashed</li>
                    <li itemprop="recipeIngredient">2 cups flour</li>
                </ul>
                <p itemprop="recipeInstructions">Mix everything.</p>
                <p itemprop="recipeInstructions">Bake.</p>
            </div>
            </body></html>
        "#;
        let context = ParsingContext {
            url: "https://bakes.example.org/banana".to_string(),
            document: Html::parse_document(html),
        };

        let recipe = MicroDataExtractor.parse(&context).unwrap();
        assert_eq!(recipe.title, "Banana Bread");
        assert_eq!(recipe.author.as_deref(), Some("Ann Baker"));
        assert_eq!(recipe.cover_image_url.as_deref(), Some("https://example.com/bread.jpg"));
        assert_eq!(recipe.prep_minutes, Some(10));
        assert_eq!(recipe.cook_minutes, Some(60));
        assert_eq!(recipe.yield_quantity, Some(1.0));
        assert_eq!(recipe.yield_unit.as_deref(), Some("loaf"));
        assert_eq!(recipe.ingredients.len(), 2);
        assert_eq!(recipe.ingredients[0].preparation.as_deref(), Some("mashed"));
        assert_eq!(recipe.instructions.len(), 2);
        assert_eq!(recipe.source_name.as_deref(), Some("bakes.example.org"));
    }

    #[test]
    fn test_every_ingredient_element_is_kept() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Recipe">
                <h1 itemprop="name">Apple Pie</h1>
                <ul>
                    <li itemprop="recipeIngredient">For the filling:</li>
                    <li itemprop="recipeIngredient">6 apples, sliced</li>
                    <li itemprop="recipeIngredient"> </li>
                    <li itemprop="recipeIngredient">1/2 cup sugar</li>
                </ul>
            </div>
        "#;
        let context = ParsingContext {
            url: "https://example.com/pie".to_string(),
            document: Html::parse_document(html),
        };

        let recipe = MicroDataExtractor.parse(&context).unwrap();
        assert_eq!(recipe.ingredients.len(), 4);
        assert_eq!(recipe.ingredients[0].name, "");
        assert_eq!(recipe.ingredients[0].original_text.as_deref(), Some("For the filling:"));
        assert_eq!(recipe.ingredients[1].name, "apples");
        assert_eq!(recipe.ingredients[2].name, "");
        assert_eq!(recipe.ingredients[3].quantity, Some(0.5));
    }

    #[test]
    fn test_requires_recipe_container() {
        let html = r#"<div itemprop="name">Site title</div>"#;
        let context = ParsingContext {
            url: "https://example.com".to_string(),
            document: Html::parse_document(html),
        };
        assert!(MicroDataExtractor.parse(&context).is_err());
    }
}
