use async_trait::async_trait;
use mealplan_core::providers::{ExtractionRequest, LlmProvider, SourceKind};
use mealplan_core::video::{CaptionSegment, VideoMetadata, VideoSource};
use mealplan_core::{ImportError, ImportStage, RecipeImporter, UrlCheck, UrlCheckSink};
use std::error::Error;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const VIDEO_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

const MODEL_RESPONSE: &str = r#"{"recipes": [
    {
        "title": "Weeknight Garlic Noodles",
        "ingredients": ["8 oz spaghetti", "4 cloves garlic, minced", "3 tbsp butter"],
        "instructions": [
            {"step_number": 2, "text": "Toss the noodles in garlic butter."},
            {"step_number": 1, "text": "Boil the spaghetti."}
        ],
        "video_start_seconds": 95
    },
    {
        "title": "Quick Cucumber Salad",
        "ingredients": ["1 cucumber, sliced", "1 tbsp rice vinegar"],
        "instructions": ["Combine and chill."]
    }
]}"#;

#[derive(Clone)]
struct FakeVideo {
    description: String,
    captions: Option<Vec<CaptionSegment>>,
    audio_calls: Arc<AtomicUsize>,
}

impl FakeVideo {
    fn new(description: &str, captions: Option<Vec<CaptionSegment>>) -> Self {
        Self {
            description: description.to_string(),
            captions,
            audio_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl VideoSource for FakeVideo {
    async fn metadata(&self, video_id: &str) -> Result<VideoMetadata, Box<dyn Error + Send + Sync>> {
        assert_eq!(video_id, "dQw4w9WgXcQ");
        Ok(VideoMetadata {
            title: "Two dinners in 20 minutes".to_string(),
            description: Some(self.description.clone()),
            channel: Some("Pantry Cooking".to_string()),
            thumbnail_url: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg".to_string()),
        })
    }

    async fn captions(
        &self,
        _video_id: &str,
    ) -> Result<Option<Vec<CaptionSegment>>, Box<dyn Error + Send + Sync>> {
        Ok(self.captions.clone())
    }

    async fn audio(&self, _video_id: &str) -> Result<(Vec<u8>, String), Box<dyn Error + Send + Sync>> {
        self.audio_calls.fetch_add(1, Ordering::SeqCst);
        Ok((vec![0x49, 0x44, 0x33], "mp3".to_string()))
    }
}

#[derive(Clone)]
struct ScriptedProvider {
    requests: Arc<Mutex<Vec<ExtractionRequest>>>,
    transcriptions: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new() -> Self {
        Self {
            requests: Arc::new(Mutex::new(Vec::new())),
            transcriptions: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl LlmProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn extract_recipes(
        &self,
        request: &ExtractionRequest,
    ) -> Result<String, Box<dyn Error + Send + Sync>> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(MODEL_RESPONSE.to_string())
    }

    async fn transcribe(&self, audio: &[u8], format: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        assert_eq!(format, "mp3");
        assert!(!audio.is_empty());
        self.transcriptions.fetch_add(1, Ordering::SeqCst);
        Ok("First boil the spaghetti, then toss it with garlic butter.".to_string())
    }
}

#[derive(Clone, Default)]
struct RecordingSink {
    checks: Arc<Mutex<Vec<UrlCheck>>>,
}

impl UrlCheckSink for RecordingSink {
    fn record(&self, check: UrlCheck) {
        self.checks.lock().unwrap().push(check);
    }
}

fn captions() -> Vec<CaptionSegment> {
    vec![
        CaptionSegment {
            start_seconds: 0.0,
            text: "Hey everyone, two dinners today.".to_string(),
        },
        CaptionSegment {
            start_seconds: 95.4,
            text: "Start by boiling eight ounces of spaghetti.".to_string(),
        },
    ]
}

#[tokio::test]
async fn test_linked_recipe_page_wins() {
    let mut server = mockito::Server::new_async().await;
    let _social = server
        .mock("GET", "/about")
        .with_status(200)
        .with_body("<html><body><p>About the channel.</p></body></html>")
        .create_async()
        .await;
    let _recipe = server
        .mock("GET", "/garlic-noodles")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body(
            r#"<html><head><script type="application/ld+json">
            {"@context": "https://schema.org", "@type": "Recipe",
             "name": "Garlic Noodles",
             "recipeIngredient": ["8 oz spaghetti", "4 cloves garlic"],
             "recipeInstructions": "Boil. Toss."}
            </script></head><body></body></html>"#,
        )
        .create_async()
        .await;

    let description = format!(
        "Follow me on https://instagram.com/pantrycooking\nAbout: {base}/about\nFull recipe: {base}/garlic-noodles.",
        base = server.url()
    );
    let video = FakeVideo::new(&description, Some(captions()));
    let provider = ScriptedProvider::new();
    let sink = RecordingSink::default();
    let importer = RecipeImporter::builder()
        .provider(provider.clone())
        .video_source(video.clone())
        .audit_sink(sink.clone())
        .build()
        .unwrap();

    let recipes = importer.import_from_url(VIDEO_URL).await.unwrap();

    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0].title, "Garlic Noodles");
    let linked = format!("{}/garlic-noodles", server.url());
    assert_eq!(recipes[0].source_url.as_deref(), Some(linked.as_str()));
    assert!(provider.requests.lock().unwrap().is_empty());
    assert_eq!(video.audio_calls.load(Ordering::SeqCst), 0);

    let checks = sink.checks.lock().unwrap();
    let urls: Vec<(&str, bool)> = checks.iter().map(|c| (c.url.as_str(), c.recipe_found)).collect();
    assert_eq!(
        urls,
        vec![
            (format!("{}/about", server.url()).as_str(), false),
            (linked.as_str(), true),
            (VIDEO_URL, true),
        ]
    );
}

#[tokio::test]
async fn test_captions_feed_the_model() {
    let video = FakeVideo::new("Ingredients are in the video!", Some(captions()));
    let provider = ScriptedProvider::new();
    let importer = RecipeImporter::builder()
        .provider(provider.clone())
        .video_source(video.clone())
        .build()
        .unwrap();

    let recipes = importer.import_from_url(VIDEO_URL).await.unwrap();

    assert_eq!(recipes.len(), 2);
    let noodles = &recipes[0];
    assert_eq!(noodles.video_start_seconds, Some(95));
    assert_eq!(noodles.instructions[0].text, "Boil the spaghetti.");
    assert_eq!(noodles.instructions[1].step_number, 2);
    assert_eq!(noodles.source_url.as_deref(), Some(VIDEO_URL));
    assert_eq!(noodles.author.as_deref(), Some("Pantry Cooking"));
    assert_eq!(
        noodles.cover_image_url.as_deref(),
        Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
    );
    assert_eq!(recipes[1].video_start_seconds, Some(0));

    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SourceKind::Captions);
    assert!(requests[0].content.contains("[01:35] Start by boiling"));
    assert!(requests[0].user_message().contains("Two dinners in 20 minutes"));
    assert_eq!(video.audio_calls.load(Ordering::SeqCst), 0);
    assert_eq!(provider.transcriptions.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_missing_captions_fall_back_to_audio() {
    let video = FakeVideo::new("", None);
    let provider = ScriptedProvider::new();
    let importer = RecipeImporter::builder()
        .provider(provider.clone())
        .video_source(video.clone())
        .build()
        .unwrap();

    let recipes = importer.import_from_url(VIDEO_URL).await.unwrap();

    assert_eq!(recipes.len(), 2);
    assert_eq!(video.audio_calls.load(Ordering::SeqCst), 1);
    assert_eq!(provider.transcriptions.load(Ordering::SeqCst), 1);
    let requests = provider.requests.lock().unwrap();
    assert_eq!(requests[0].kind, SourceKind::Transcript);
    assert!(requests[0].content.contains("garlic butter"));
}

#[tokio::test]
async fn test_audio_without_provider_is_empty() {
    let video = FakeVideo::new("", Some(Vec::new()));
    let importer = RecipeImporter::builder()
        .video_source(video.clone())
        .build()
        .unwrap();

    let recipes = importer.import_from_url(VIDEO_URL).await.unwrap();
    assert!(recipes.is_empty());
    assert_eq!(video.audio_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_metadata_failure_reports_stage() {
    struct Unavailable;

    #[async_trait]
    impl VideoSource for Unavailable {
        async fn metadata(&self, _video_id: &str) -> Result<VideoMetadata, Box<dyn Error + Send + Sync>> {
            Err("video is private".into())
        }

        async fn captions(
            &self,
            _video_id: &str,
        ) -> Result<Option<Vec<CaptionSegment>>, Box<dyn Error + Send + Sync>> {
            Ok(None)
        }

        async fn audio(&self, _video_id: &str) -> Result<(Vec<u8>, String), Box<dyn Error + Send + Sync>> {
            Err("video is private".into())
        }
    }

    let importer = RecipeImporter::builder()
        .video_source(Unavailable)
        .build()
        .unwrap();
    let result = importer.import_from_url("https://youtu.be/dQw4w9WgXcQ").await;

    match result {
        Err(ImportError::SourceUnavailable { stage, message, .. }) => {
            assert_eq!(stage, ImportStage::VideoMetadata);
            assert!(message.contains("private"));
        }
        other => panic!("Expected SourceUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_url_is_rejected() {
    let importer = RecipeImporter::builder().build().unwrap();
    for url in ["not a url", "ftp://example.com/recipe", "mailto:cook@example.com"] {
        assert!(matches!(
            importer.import_from_url(url).await,
            Err(ImportError::InvalidUrl(_))
        ));
    }
}
