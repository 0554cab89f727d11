use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::error::Error;

use crate::config::FetchConfig;

const ACCEPT_HTML: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";

/// Plain HTTP GET with desktop-browser headers. Follows redirects and sets no
/// timeout; cancellation is up to the caller.
pub struct RequestFetcher {
    client: Client,
}

impl RequestFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, config.accept_language.parse()?);

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .redirect(Policy::limited(10))
            .build()?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
        debug!("Fetching {}", url);
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(format!("Request failed with status: {}", response.status()).into());
        }

        let html = response.text().await?;
        Ok(html)
    }
}
