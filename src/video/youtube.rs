//! Host recognition and link scanning for video URLs.

use regex::Regex;
use reqwest::Url;
use std::sync::LazyLock;

static VIDEO_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Invalid video id regex"));

static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"'()\[\]]+"#).expect("Invalid link regex"));

const WATCH_HOSTS: &[&str] = &["youtube.com", "www.youtube.com", "m.youtube.com"];

const PATH_PREFIXES: &[&str] = &["shorts", "embed", "live"];

/// Hosts whose links never point at a recipe page.
const NON_RECIPE_HOSTS: &[&str] = &[
    "youtube.com",
    "youtu.be",
    "instagram.com",
    "facebook.com",
    "fb.com",
    "tiktok.com",
    "twitter.com",
    "x.com",
    "pinterest.com",
    "patreon.com",
    "threads.net",
    "linktr.ee",
    "discord.gg",
    "twitch.tv",
];

/// The video id for a recognized video URL.
pub fn video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    let candidate = if host == "youtu.be" {
        parsed.path_segments()?.next().map(str::to_string)
    } else if WATCH_HOSTS.contains(&host.as_str()) {
        let mut segments = parsed.path_segments()?;
        match segments.next() {
            Some("watch") => parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned()),
            Some(prefix) if PATH_PREFIXES.contains(&prefix) => segments.next().map(str::to_string),
            _ => None,
        }
    } else {
        None
    }?;

    VIDEO_ID_REGEX.is_match(&candidate).then_some(candidate)
}

/// External links in a video description that may lead to a written recipe,
/// in order of appearance, deduplicated.
pub fn recipe_links(description: &str) -> Vec<String> {
    let mut links: Vec<String> = Vec::new();
    for found in LINK_REGEX.find_iter(description) {
        let link = found.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']);
        let Ok(parsed) = Url::parse(link) else {
            continue;
        };
        let Some(host) = parsed.host_str() else {
            continue;
        };
        if is_non_recipe_host(host) {
            continue;
        }
        if !links.iter().any(|l| l == link) {
            links.push(link.to_string());
        }
    }
    links
}

fn is_non_recipe_host(host: &str) -> bool {
    let host = host.to_lowercase();
    NON_RECIPE_HOSTS
        .iter()
        .any(|blocked| host == *blocked || host.ends_with(&format!(".{}", blocked)))
}
