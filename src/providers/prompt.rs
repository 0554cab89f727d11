/// System prompt for turning page text or a video transcript into recipes.
///
/// The requested shape mirrors what `parse_candidates` accepts, but the
/// response is still validated field by field.
pub const RECIPE_EXTRACTION_PROMPT: &str = r#"You extract cooking recipes from text.

Return ONLY a JSON object of the form {"recipes": [...]} with one entry per distinct recipe found. Return {"recipes": []} when the text contains no recipe.

Each recipe has these fields:
- "title": string, required
- "description": string or null
- "ingredients": array of objects {"quantity": number or null, "quantity_max": number or null, "unit": string or null, "name": string, "preparation": string or null, "notes": string or null, "optional": boolean}
- "instructions": array of objects {"step_number": integer starting at 1, "text": string, "section": string or null}
- "servings": number or null
- "prep_minutes": integer or null
- "cook_minutes": integer or null
- "difficulty": "easy", "medium", "hard" or null
- "tags": array of strings
- "video_start_seconds": integer or null

Rules:
- Copy quantities exactly as written. Convert fractions to decimals (1/2 becomes 0.5).
- For a range such as "2-3 cloves" set quantity to 2 and quantity_max to 3.
- Do not invent ingredients or steps that are not in the text.
- Transcripts contain [mm:ss] markers. Set "video_start_seconds" to the time where the recipe begins, otherwise null.
"#;

/// Instruction sent alongside audio when asking for a transcript.
pub const TRANSCRIPTION_PROMPT: &str =
    "Transcribe this cooking video audio verbatim. Return only the transcript text.";

/// What kind of text the model is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    WebPage,
    Captions,
    Transcript,
}

impl SourceKind {
    fn label(&self) -> &'static str {
        match self {
            SourceKind::WebPage => "visible text of a web page",
            SourceKind::Captions => "caption track of a cooking video",
            SourceKind::Transcript => "audio transcript of a cooking video",
        }
    }
}

/// Input for one model-assisted extraction call.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub content: String,
    pub kind: SourceKind,
    /// Context such as the video title, description or linked-page markup.
    pub hints: Vec<String>,
}

impl ExtractionRequest {
    pub fn new(content: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            content: content.into(),
            kind,
            hints: Vec::new(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        if !hint.trim().is_empty() {
            self.hints.push(hint);
        }
        self
    }

    /// The user message for this request.
    pub fn user_message(&self) -> String {
        let mut message = format!("The following is the {}.\n", self.kind.label());
        if !self.hints.is_empty() {
            message.push_str("\nContext:\n");
            for hint in &self.hints {
                message.push_str("- ");
                message.push_str(hint.trim());
                message.push('\n');
            }
        }
        message.push_str("\nContent:\n");
        message.push_str(&self.content);
        message
    }
}
