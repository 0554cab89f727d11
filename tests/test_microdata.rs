#[cfg(test)]
mod tests {
    use mealplan_core::extractors::MicroDataExtractor;
    use mealplan_core::extractors::{extract_structured, Extractor, ParsingContext};
    use scraper::Html;

    const BANANA_BREAD: &str = r#"
        <html>
        <head>
            <meta property="og:image" content="https://example.com/og-banana.jpg" />
        </head>
        <body>
        <div id="easyrecipe-557-0" class="easyrecipe" itemscope itemtype="http://schema.org/Recipe">
            <div itemprop="name" class="ERSName">Mom's Famous Banana Bread</div>
            <div itemprop="description" class="ERSSummary">Mom was kind enough to share her famous banana bread recipe with us!</div>
            <img itemprop="image" src="https://example.com/banana-bread.jpg" />
            <div itemprop="author" itemscope itemtype="http://schema.org/Person">
                <span itemprop="name">Cooking Divine</span>
            </div>
            <div itemprop="recipeCategory">Breakfast</div>
            <div itemprop="recipeCuisine">American</div>
            <div itemprop="keywords">banana, bread, sweet</div>
            <div itemprop="suitableForDiet">Vegetarian</div>

            <div class="ERSTimes">
                <div class="ERSTime">
                    <div class="ERSTimeHeading">Prep time</div>
                    <div class="ERSTimeItem">
                        <time itemprop="prepTime" datetime="PT10M">10 mins</time>
                    </div>
                </div>
                <div class="ERSTime ERSTimeRight">
                    <div class="ERSTimeHeading">Cook time</div>
                    <div class="ERSTimeItem">
                        <time itemprop="cookTime" datetime="PT1H">1 hour</time>
                    </div>
                </div>
                <div class="ERSTime ERSTimeRight">
                    <div class="ERSTimeHeading">Total time</div>
                    <div class="ERSTimeItem">
                        <time itemprop="totalTime" datetime="PT1H10M">1 hour 10 mins</time>
                    </div>
                </div>
            </div>

            <div class="divERSHeadItems">
                <div class="ERSServes">Serves: <span itemprop="recipeYield">12 servings</span></div>
            </div>

            <div class="ERSIngredients">
                <div class="ERSIngredientsHeader ERSHeading">Ingredients</div>
                <ul>
                    <li class="ingredient" itemprop="ingredients">5 Tablespoons Butter (room temperature)</li>
                    <li class="ingredient" itemprop="ingredients">1 Cup White Sugar</li>
                    <li class="ingredient" itemprop="ingredients">1 Large Egg</li>
                </ul>
            </div>

            <div class="ERSInstructions">
                <div class="ERSInstructionsHeader ERSHeading">Directions</div>
                <ol>
                    <li class="instruction" itemprop="recipeInstructions">Preheat oven to 350 degrees and heavily grease a 9 inch bread pan.</li>
                    <li class="instruction" itemprop="recipeInstructions">Beat butter and sugar until light, fluffy and well blended.</li>
                </ol>
            </div>
        </div>
        </body>
        </html>
        "#;

    #[test]
    fn test_microdata_extraction() {
        let context = ParsingContext {
            url: "https://www.cookingdivine.com/recipes/banana-bread/".to_string(),
            document: Html::parse_document(BANANA_BREAD),
        };

        let result = MicroDataExtractor.parse(&context);
        assert!(result.is_ok(), "Failed to extract recipe");
        let recipe = result.unwrap();

        assert_eq!(recipe.title, "Mom's Famous Banana Bread");
        assert_eq!(
            recipe.description.as_deref(),
            Some("Mom was kind enough to share her famous banana bread recipe with us!")
        );

        assert_eq!(recipe.ingredients.len(), 3);
        let butter = &recipe.ingredients[0];
        assert_eq!(butter.quantity, Some(5.0));
        assert_eq!(butter.unit.as_deref(), Some("tablespoon"));
        assert_eq!(butter.name, "Butter");
        assert_eq!(butter.preparation.as_deref(), Some("room temperature"));
        assert_eq!(recipe.ingredients[1].unit.as_deref(), Some("cup"));
        assert_eq!(recipe.ingredients[2].name, "Large Egg");

        assert_eq!(recipe.instructions.len(), 2);
        assert_eq!(recipe.instructions[0].step_number, 1);
        assert!(recipe.instructions[0].text.starts_with("Preheat oven to 350 degrees"));

        assert_eq!(recipe.prep_minutes, Some(10));
        assert_eq!(recipe.cook_minutes, Some(60));
        assert_eq!(recipe.yield_quantity, Some(12.0));
        assert_eq!(recipe.yield_unit.as_deref(), Some("servings"));
        assert_eq!(recipe.author.as_deref(), Some("Cooking Divine"));
        assert_eq!(
            recipe.cover_image_url.as_deref(),
            Some("https://example.com/banana-bread.jpg")
        );
        assert_eq!(recipe.source_name.as_deref(), Some("cookingdivine.com"));
        assert_eq!(
            recipe.tags,
            vec!["banana", "bread", "sweet", "Breakfast", "American"]
        );
    }

    #[test]
    fn test_microdata_used_when_no_json_ld() {
        let recipe = extract_structured(BANANA_BREAD, "https://www.cookingdivine.com/recipes/banana-bread/")
            .expect("markup should be found");
        assert_eq!(recipe.title, "Mom's Famous Banana Bread");
        // The itemprop image wins over og:image.
        assert_eq!(
            recipe.cover_image_url.as_deref(),
            Some("https://example.com/banana-bread.jpg")
        );
    }

    #[test]
    fn test_prep_derived_from_total() {
        let html = r#"
            <div itemscope itemtype="https://schema.org/Recipe">
                <span itemprop="name">Slow Cooker Chili</span>
                <meta itemprop="cookTime" content="PT6H">
                <meta itemprop="totalTime" content="PT6H20M">
                <span itemprop="recipeIngredient">1 lb ground beef</span>
            </div>
        "#;
        let context = ParsingContext {
            url: "https://example.com/chili".to_string(),
            document: Html::parse_document(html),
        };

        let recipe = MicroDataExtractor.parse(&context).unwrap();
        assert_eq!(recipe.cook_minutes, Some(360));
        assert_eq!(recipe.prep_minutes, Some(20));
        assert_eq!(recipe.ingredients[0].unit.as_deref(), Some("pound"));
        assert!(recipe.instructions.is_empty());
    }

    #[test]
    fn test_untyped_itemprops_are_ignored() {
        let html = r#"
            <html><body>
                <div itemscope itemtype="https://schema.org/WebSite">
                    <span itemprop="name">My Food Blog</span>
                </div>
                <li itemprop="recipeIngredient">2 cups flour</li>
            </body></html>
        "#;
        assert!(extract_structured(html, "https://example.com/post").is_none());
    }
}
