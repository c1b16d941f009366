// src/api/model.rs
// =============================================================================
// This module defines the wire format we exchange with the scraping API.
//
// The service speaks JSON:
// - We POST a request body describing the URL and which formats we want
// - It replies with an envelope: { "success": bool, "data": {...}, "error": "..." }
// - The data object holds the converted page plus metadata about it
//
// The service uses camelCase field names (it's a JavaScript-first API), so
// we use #[serde(rename_all = "camelCase")] to translate from our snake_case.
//
// Rust concepts:
// - Derive macros: Serialize/Deserialize generate the JSON code for us
// - Option<T>: Most response fields are only present when requested
// - Enums with serde attributes: Map Rust variants to wire strings
// =============================================================================

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// The output formats the service can convert a page into
//
// ValueEnum lets clap accept these directly on the command line
// (--format markdown, --format raw-html, etc.), while the serde
// attribute produces the camelCase names the API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum Format {
    /// The page converted to CommonMark markdown
    Markdown,
    /// Cleaned-up HTML (boilerplate stripped)
    Html,
    /// The HTML exactly as the page served it
    RawHtml,
    /// Just the hyperlinks found on the page
    Links,
}

// The request body for POST /v1/scrape
//
// Only the fields we actually set are serialized; `timeout` is skipped
// entirely when None so we don't override the service default.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    /// The page to scrape
    pub url: String,
    /// Which output formats to produce (at least one)
    pub formats: Vec<Format>,
    /// Ask the service to strip navigation, footers and other boilerplate
    pub only_main_content: bool,
    /// Service-side time budget for the scrape, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
}

// The top-level response envelope
//
// Every response (success or failure) arrives wrapped in this shape.
// On success, `data` is present; on failure, `error` carries a message.
// We default `success` to false so a body missing the field entirely
// is treated as a failure rather than a deserialization error.
#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeEnvelope {
    #[serde(default)]
    pub success: bool,
    pub data: Option<Document>,
    pub error: Option<String>,
}

// The scraped page in the formats we asked for
//
// Each format field is None unless it was requested, so we skip the
// absent ones when re-serializing for --json output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Returns the body for the given format, if the response carried it
    ///
    /// The Links format has no single text body, so it's rendered as one
    /// URL per line (the same shape the --links flag prints).
    pub fn body_for(&self, format: Format) -> Option<String> {
        match format {
            Format::Markdown => self.markdown.clone(),
            Format::Html => self.html.clone(),
            Format::RawHtml => self.raw_html.clone(),
            Format::Links => self.links.as_ref().map(|links| links.join("\n")),
        }
    }
}

// Page metadata the service extracts during the scrape
//
// sourceURL is the one field the API spells in SCREAMING camelCase,
// so it gets an explicit rename instead of relying on rename_all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "sourceURL", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_camel_case_fields() {
        let request = ScrapeRequest {
            url: "https://example.com".to_string(),
            formats: vec![Format::Markdown, Format::RawHtml],
            only_main_content: true,
            timeout: Some(30_000),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["formats"][0], "markdown");
        assert_eq!(json["formats"][1], "rawHtml");
        assert_eq!(json["onlyMainContent"], true);
        assert_eq!(json["timeout"], 30_000);
    }

    #[test]
    fn test_request_skips_timeout_when_unset() {
        let request = ScrapeRequest {
            url: "https://example.com".to_string(),
            formats: vec![Format::Markdown],
            only_main_content: false,
            timeout: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("timeout").is_none());
    }

    #[test]
    fn test_deserialize_success_envelope() {
        let body = r##"{
            "success": true,
            "data": {
                "markdown": "# Example\n\nHello.",
                "metadata": {
                    "title": "Example Domain",
                    "sourceURL": "https://example.com",
                    "statusCode": 200
                }
            }
        }"##;

        let envelope: ScrapeEnvelope = serde_json::from_str(body).unwrap();
        assert!(envelope.success);

        let doc = envelope.data.unwrap();
        assert_eq!(doc.markdown.as_deref(), Some("# Example\n\nHello."));
        assert_eq!(doc.metadata.title.as_deref(), Some("Example Domain"));
        assert_eq!(doc.metadata.source_url.as_deref(), Some("https://example.com"));
        assert_eq!(doc.metadata.status_code, Some(200));
    }

    #[test]
    fn test_deserialize_error_envelope() {
        let body = r#"{"success": false, "error": "Invalid API key"}"#;

        let envelope: ScrapeEnvelope = serde_json::from_str(body).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.as_deref(), Some("Invalid API key"));
    }

    #[test]
    fn test_deserialize_envelope_missing_success_field() {
        // Some error paths return a bare message without the success flag.
        // Missing flag must read as failure, not parse as success.
        let body = r#"{"error": "Internal server error"}"#;

        let envelope: ScrapeEnvelope = serde_json::from_str(body).unwrap();
        assert!(!envelope.success);
    }

    #[test]
    fn test_body_for_each_format() {
        let doc = Document {
            markdown: Some("# Hi".to_string()),
            links: Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string(),
            ]),
            ..Document::default()
        };

        assert_eq!(doc.body_for(Format::Markdown).as_deref(), Some("# Hi"));
        assert_eq!(doc.body_for(Format::Html), None);
        assert_eq!(
            doc.body_for(Format::Links).as_deref(),
            Some("https://a.example\nhttps://b.example")
        );
    }
}
