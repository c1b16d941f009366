// src/batch/runner.rs
// =============================================================================
// This module scrapes many URLs concurrently.
//
// Why concurrent?
// - Each scrape spends most of its time waiting on the service
// - The service renders pages remotely, so 20 in flight cost us almost
//   nothing locally
// - But unlimited concurrency trips the service's rate limiter, so the
//   caller picks a cap (--concurrency) and we buffer_unordered to it
//
// Rust concepts:
// - Streams: buffer_unordered runs up to N futures at once
// - Clone: each task gets its own handle to the (pooled) client
// =============================================================================

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::api::{ScrapeClient, ScrapeOptions, ScrapeOutcome, ScrapeStatus};

// Scrapes every URL in the list, at most `concurrency` at a time
//
// Results come back in completion order, not input order - the summary
// table doesn't care, and it lets fast pages finish ahead of slow ones.
pub async fn scrape_all(
    client: &ScrapeClient,
    urls: Vec<String>,
    options: &ScrapeOptions,
    concurrency: usize,
) -> Vec<ScrapeOutcome> {
    let futures = urls.into_iter().map(|url| {
        let client = client.clone();
        let options = options.clone();
        async move { client.scrape(&url, &options).await }
    });

    stream::iter(futures)
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await
}

// One row of the batch summary
//
// A slimmed-down view of a ScrapeOutcome: the summary (table or JSON)
// wants to say what happened to each URL, not carry whole page bodies.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeReport {
    pub url: String,
    #[serde(flatten)]
    pub status: ScrapeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Size of the scraped markdown body, when one came back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_bytes: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Where the body was written, when --output-dir was used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saved_to: Option<String>,
}

impl ScrapeReport {
    pub fn from_outcome(outcome: &ScrapeOutcome, saved_to: Option<String>) -> Self {
        let document = outcome.document.as_ref();

        ScrapeReport {
            url: outcome.url.clone(),
            status: outcome.status.clone(),
            title: document.and_then(|d| d.metadata.title.clone()),
            markdown_bytes: document.and_then(|d| d.markdown.as_ref().map(|m| m.len())),
            message: outcome.message.clone(),
            saved_to,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == ScrapeStatus::Ok
    }
}
