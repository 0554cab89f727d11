mod youtube;

pub use youtube::{recipe_links, video_id};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: Option<String>,
    pub channel: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// One caption cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub start_seconds: f64,
    pub text: String,
}

/// Metadata, caption and audio collaborator for a video host.
#[async_trait]
pub trait VideoSource: Send + Sync {
    async fn metadata(&self, video_id: &str) -> Result<VideoMetadata, Box<dyn Error + Send + Sync>>;

    /// `Ok(None)` when captions are disabled or missing for the video.
    async fn captions(
        &self,
        video_id: &str,
    ) -> Result<Option<Vec<CaptionSegment>>, Box<dyn Error + Send + Sync>>;

    /// Raw audio bytes plus their container format (e.g. "mp3").
    async fn audio(&self, video_id: &str) -> Result<(Vec<u8>, String), Box<dyn Error + Send + Sync>>;
}

/// Render captions as `[mm:ss] text` lines so the model can report where a
/// recipe starts.
pub fn render_transcript(segments: &[CaptionSegment]) -> String {
    segments
        .iter()
        .filter(|segment| !segment.text.trim().is_empty())
        .map(|segment| format!("[{}] {}", timestamp(segment.start_seconds), segment.text.trim()))
        .collect::<Vec<_>>()
        .join("\n")
}

fn timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", total / 60, total % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_transcript() {
        let segments = vec![
            CaptionSegment {
                start_seconds: 4.2,
                text: "Hi everyone".to_string(),
            },
            CaptionSegment {
                start_seconds: 61.0,
                text: "  ".to_string(),
            },
            CaptionSegment {
                start_seconds: 3725.9,
                text: "add the garlic ".to_string(),
            },
        ];
        assert_eq!(render_transcript(&segments), "[00:04] Hi everyone\n[62:05] add the garlic");
    }

    #[test]
    fn test_timestamp_clamps_invalid() {
        assert_eq!(timestamp(-3.0), "00:00");
        assert_eq!(timestamp(f64::NAN), "00:00");
    }
}
