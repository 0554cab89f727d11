use log::{debug, info, warn};

use crate::audit::UrlCheck;
use crate::builder::RecipeImporter;
use crate::error::{ImportError, ImportStage};
use crate::extractors::{extract_structured, extract_visible_text, site_name};
use crate::model::ImportedRecipe;
use crate::providers::{ExtractionRequest, SourceKind};
use crate::video::{recipe_links, render_transcript, VideoMetadata, VideoSource};

/// Linked-page text handed to the audio stage is capped at this many chars.
const LINKED_HINT_CHARS: usize = 4000;

/// Fallback stages, tried in order until one produces an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VideoStage {
    LinkedPage,
    Captions,
    AudioTranscription,
}

const VIDEO_STAGES: [VideoStage; 3] = [
    VideoStage::LinkedPage,
    VideoStage::Captions,
    VideoStage::AudioTranscription,
];

struct VideoContext<'a> {
    url: &'a str,
    video_id: &'a str,
    source: &'a dyn VideoSource,
    metadata: VideoMetadata,
    /// Visible text of linked pages that had no recipe markup.
    linked_text: Vec<String>,
}

impl VideoContext<'_> {
    fn hints(&self) -> Vec<String> {
        let mut hints = vec![format!("Video title: {}", self.metadata.title)];
        if let Some(channel) = &self.metadata.channel {
            hints.push(format!("Channel: {}", channel));
        }
        if let Some(description) = &self.metadata.description {
            hints.push(format!("Video description: {}", description));
        }
        for text in &self.linked_text {
            hints.push(format!("Linked page text: {}", text));
        }
        hints
    }

    fn request(&self, content: String, kind: SourceKind) -> ExtractionRequest {
        self.hints()
            .into_iter()
            .fold(ExtractionRequest::new(content, kind), |request, hint| request.with_hint(hint))
    }
}

/// Import a video: linked recipe page, then captions, then audio
/// transcription. `Ok(None)` from a stage means "try the next one".
pub(crate) async fn process(
    importer: &RecipeImporter,
    url: &str,
    video_id: &str,
    source: &dyn VideoSource,
) -> Result<Vec<ImportedRecipe>, ImportError> {
    let result = run_stages(importer, url, video_id, source).await;
    match &result {
        Ok(recipes) => importer.record(UrlCheck::found(url, !recipes.is_empty())),
        Err(e) => importer.record(UrlCheck::failed(url, e)),
    }
    result
}

async fn run_stages(
    importer: &RecipeImporter,
    url: &str,
    video_id: &str,
    source: &dyn VideoSource,
) -> Result<Vec<ImportedRecipe>, ImportError> {
    let metadata = source
        .metadata(video_id)
        .await
        .map_err(|e| ImportError::unavailable(url, ImportStage::VideoMetadata, e))?;

    let mut context = VideoContext {
        url,
        video_id,
        source,
        metadata,
        linked_text: Vec::new(),
    };

    for stage in VIDEO_STAGES {
        debug!("Video stage {:?} for {}", stage, url);
        let outcome = match stage {
            VideoStage::LinkedPage => linked_page(importer, &mut context).await,
            VideoStage::Captions => captions(importer, &context).await?,
            VideoStage::AudioTranscription => Some(audio_transcription(importer, &context).await?),
        };
        if let Some(recipes) = outcome {
            info!("Video stage {:?} produced {} recipe(s) for {}", stage, recipes.len(), url);
            return Ok(recipes);
        }
    }

    Ok(Vec::new())
}

/// A recipe page linked from the description is ground truth when it carries
/// recipe markup. Pages that fail or have no markup are recorded and skipped.
async fn linked_page(
    importer: &RecipeImporter,
    context: &mut VideoContext<'_>,
) -> Option<Vec<ImportedRecipe>> {
    let description = context.metadata.description.clone().unwrap_or_default();

    for link in recipe_links(&description) {
        let html = match importer.fetcher.fetch(&link).await {
            Ok(html) => html,
            Err(e) => {
                warn!("Linked page {} unavailable: {}", link, e);
                importer.record(UrlCheck::failed(&link, e));
                continue;
            }
        };

        if let Some(recipe) = extract_structured(&html, &link) {
            importer.record(UrlCheck::found(&link, true));
            return Some(vec![recipe]);
        }

        importer.record(UrlCheck::found(&link, false));
        let text: String = extract_visible_text(&html).chars().take(LINKED_HINT_CHARS).collect();
        if !text.is_empty() {
            context.linked_text.push(text);
        }
    }

    None
}

/// Captions are final once present, even when the model finds nothing in
/// them. Missing captions fall through to audio.
async fn captions(
    importer: &RecipeImporter,
    context: &VideoContext<'_>,
) -> Result<Option<Vec<ImportedRecipe>>, ImportError> {
    let segments = context
        .source
        .captions(context.video_id)
        .await
        .map_err(|e| ImportError::unavailable(context.url, ImportStage::Captions, e))?;

    let Some(segments) = segments.filter(|segments| !segments.is_empty()) else {
        debug!("No captions for {}", context.url);
        return Ok(None);
    };

    let request = context.request(render_transcript(&segments), SourceKind::Captions);
    let recipes = super::extract_with_model(importer, context.url, request).await?;
    Ok(Some(finish_video_recipes(recipes, context)))
}

async fn audio_transcription(
    importer: &RecipeImporter,
    context: &VideoContext<'_>,
) -> Result<Vec<ImportedRecipe>, ImportError> {
    let Some(provider) = importer.provider.as_deref() else {
        debug!("No model provider configured, cannot transcribe {}", context.url);
        return Ok(Vec::new());
    };

    let (audio, format) = context
        .source
        .audio(context.video_id)
        .await
        .map_err(|e| ImportError::unavailable(context.url, ImportStage::Audio, e))?;

    let transcript = provider
        .transcribe(&audio, &format)
        .await
        .map_err(|e| ImportError::unavailable(context.url, ImportStage::Transcription, e))?;

    let request = context.request(transcript, SourceKind::Transcript);
    let recipes = super::extract_with_model(importer, context.url, request).await?;
    Ok(finish_video_recipes(recipes, context))
}

/// Fill in what the video itself knows about recipes read from its captions
/// or audio.
fn finish_video_recipes(
    recipes: Vec<ImportedRecipe>,
    context: &VideoContext<'_>,
) -> Vec<ImportedRecipe> {
    recipes
        .into_iter()
        .map(|mut recipe| {
            recipe.source_url = Some(context.url.to_string());
            recipe.source_name = recipe.source_name.or_else(|| site_name(context.url));
            recipe.author = recipe.author.or_else(|| context.metadata.channel.clone());
            recipe.cover_image_url = recipe
                .cover_image_url
                .or_else(|| context.metadata.thumbnail_url.clone());
            recipe.video_start_seconds = recipe.video_start_seconds.or(Some(0));
            recipe
        })
        .collect()
}
