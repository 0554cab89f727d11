//! Per-URL outcome records for domain allow/block curation.

use log::info;
use serde::{Deserialize, Serialize};

use crate::extractors::site_name;

/// Outcome of checking one URL during an import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlCheck {
    pub url: String,
    pub domain: String,
    pub recipe_found: bool,
    pub error: Option<String>,
}

impl UrlCheck {
    pub fn found(url: &str, recipe_found: bool) -> Self {
        Self {
            url: url.to_string(),
            domain: site_name(url).unwrap_or_default(),
            recipe_found,
            error: None,
        }
    }

    pub fn failed(url: &str, error: impl ToString) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::found(url, false)
        }
    }
}

/// Receives every [`UrlCheck`] an import produces.
pub trait UrlCheckSink: Send + Sync {
    fn record(&self, check: UrlCheck);
}

/// Default sink: writes each record to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl UrlCheckSink for LogSink {
    fn record(&self, check: UrlCheck) {
        match &check.error {
            Some(error) => info!(
                "url check: {} domain={} recipe_found=false error={}",
                check.url, check.domain, error
            ),
            None => info!(
                "url check: {} domain={} recipe_found={}",
                check.url, check.domain, check.recipe_found
            ),
        }
    }
}
