use super::selector;
use scraper::{ElementRef, Html, Node};

/// Recipe-labeled containers first, then generic content containers.
const CONTAINER_GROUPS: &[&str] = &[
    "[itemtype*='Recipe'], [class*='recipe'], [id*='recipe']",
    "article",
    "main, [role='main']",
];

/// A container shorter than this is probably a title or a card, not the recipe.
const MIN_CONTAINER_CHARS: usize = 200;

/// Visible text of a page for model-assisted extraction: boilerplate elements
/// are skipped and the recipe/article/main container is preferred when it
/// holds a meaningful amount of text.
pub fn extract_visible_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for group in CONTAINER_GROUPS {
        let Ok(group_selector) = selector(group) else {
            continue;
        };
        let best = document
            .select(&group_selector)
            .map(|element| extract_inner_texts(element).join("\n"))
            .max_by_key(|text| text.len());
        if let Some(text) = best.filter(|text| text.len() >= MIN_CONTAINER_CHARS) {
            return text;
        }
    }

    extract_inner_texts(document.root_element()).join("\n")
}

fn extract_inner_texts(root: ElementRef) -> Vec<String> {
    let mut result = Vec::new();
    extract_text_from_element(&root, &mut result);

    // Merge the text between block markers into lines
    let mut processed = Vec::new();
    let mut current_block: Vec<String> = Vec::new();

    for text in result {
        match text.as_str() {
            "<BLOCK>" | "</BLOCK>" => flush_block(&mut current_block, &mut processed),
            text => current_block.push(text.to_string()),
        }
    }
    flush_block(&mut current_block, &mut processed);

    processed
}

fn flush_block(current_block: &mut Vec<String>, processed: &mut Vec<String>) {
    if current_block.is_empty() {
        return;
    }
    let merged = current_block.join(" ").trim().to_string();
    if !merged.is_empty() {
        processed.push(merged);
    }
    current_block.clear();
}

fn extract_text_from_element(element: &ElementRef, result: &mut Vec<String>) {
    if is_hidden(element) || should_skip_element(element) {
        return;
    }

    let tag_name = element.value().name().to_lowercase();

    if tag_name == "br" {
        result.push("<BLOCK>".to_string());
        return;
    }

    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let trimmed = normalize_whitespace(text);
                if !trimmed.is_empty() {
                    result.push(trimmed);
                }
            }
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    extract_text_from_element(&child_ref, result);
                }
            }
            _ => {}
        }
    }

    if is_block_element(&tag_name) {
        result.push("</BLOCK>".to_string());
    }
}

fn is_hidden(element: &ElementRef) -> bool {
    element.value().attr("hidden").is_some()
        || element.value().attr("aria-hidden") == Some("true")
        || element
            .value()
            .attr("style")
            .map(|s| s.contains("display: none") || s.contains("display:none") || s.contains("visibility: hidden"))
            .unwrap_or(false)
}

fn is_block_element(tag: &str) -> bool {
    matches!(
        tag,
        "address"
            | "article"
            | "aside"
            | "blockquote"
            | "dd"
            | "div"
            | "dl"
            | "dt"
            | "figcaption"
            | "figure"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "hr"
            | "li"
            | "main"
            | "ol"
            | "p"
            | "pre"
            | "section"
            | "table"
            | "tr"
            | "ul"
    )
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn should_skip_element(element: &ElementRef) -> bool {
    let tag_name = element.value().name().to_lowercase();
    matches!(
        tag_name.as_str(),
        "script"
            | "style"
            | "noscript"
            | "iframe"
            | "nav"
            | "footer"
            | "header"
            | "svg"
            | "canvas"
            | "template"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_elements_become_lines() {
        let html = r#"
            <html><body>
                <div>Hello</div>
                <p>World <b>again</b></p>
                <span>Test</span>
            </body></html>
        "#;
        assert_eq!(extract_visible_text(html), "Hello\nWorld again\nTest");
    }

    #[test]
    fn test_boilerplate_is_skipped() {
        let html = r#"
            <html><body>
                <header>Site header</header>
                <nav>Home | Recipes</nav>
                <div>Visible content</div>
                <script>console.log('Skip this');</script>
                <style>body { color: red; }</style>
                <iframe src="ad.html"></iframe>
                <div hidden>Hidden</div>
                <footer>Copyright</footer>
            </body></html>
        "#;
        assert_eq!(extract_visible_text(html), "Visible content");
    }

    #[test]
    fn test_prefers_recipe_container() {
        let long_step = "Stir the sauce slowly for a long time. ".repeat(8);
        let html = format!(
            r#"
            <html><body>
                <aside>Subscribe to our newsletter</aside>
                <div class="wprm-recipe-container">
                    <h2>Tomato Sauce</h2>
                    <p>{long_step}</p>
                </div>
                <div class="comments">Great recipe!</div>
            </body></html>
            "#
        );
        let text = extract_visible_text(&html);
        assert!(text.starts_with("Tomato Sauce"));
        assert!(!text.contains("newsletter"));
        assert!(!text.contains("Great recipe"));
    }

    #[test]
    fn test_short_container_is_ignored() {
        let html = r#"
            <html><body>
                <span class="recipe-title">Soup</span>
                <p>Boil water.</p>
            </body></html>
        "#;
        assert_eq!(extract_visible_text(html), "Soup\nBoil water.");
    }
}
