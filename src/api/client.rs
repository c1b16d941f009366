// src/api/client.rs
// =============================================================================
// This module talks to the scraping service.
//
// Key functionality:
// - Builds one reqwest::Client up front (connection pooling, timeout)
// - POSTs scrape requests to /v1/scrape with bearer authentication
// - Classifies everything that can go wrong into a ScrapeStatus
//
// Failure philosophy: a scrape that fails is a *result*, not a Rust error.
// The scrape() method always returns a ScrapeOutcome so callers (and the
// batch runner especially) can report per-URL statuses instead of aborting
// on the first bad page. Rust errors (anyhow) are reserved for local
// problems like failing to construct the HTTP client.
//
// Rust concepts:
// - async/await: The request is the single suspend point per scrape
// - Pattern matching: To map HTTP status codes to our status enum
// - Clone: The client is cheaply cloneable (reqwest pools internally)
// =============================================================================

use anyhow::Result;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::model::{Document, Format, ScrapeEnvelope, ScrapeRequest};

/// Default endpoint of the hosted scraping service
pub const DEFAULT_BASE_URL: &str = "https://api.firecrawl.dev";

// How a scrape attempt ended
//
// #[derive(Serialize, Deserialize)] lets us include the status in JSON output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScrapeStatus {
    /// The service returned a converted page
    Ok,
    /// The API key was rejected (HTTP 401/403)
    AuthError,
    /// The service asked us to slow down (HTTP 429)
    RateLimited,
    /// The service rejected the request itself (other 4xx)
    BadRequest,
    /// The service fell over (5xx)
    ServerError,
    /// The request ran out of time on our side
    Timeout,
    /// We never got a response (DNS, connect, TLS, ...)
    NetworkError,
    /// We got a response but couldn't make sense of it
    InvalidResponse,
}

// The result of one scrape attempt
//
// On success `document` is present; on failure `message` explains what
// happened. Exactly one of the two is meaningful at a time.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    /// The URL we asked the service to scrape
    pub url: String,
    /// How the attempt ended
    pub status: ScrapeStatus,
    /// The scraped page, when status is Ok
    pub document: Option<Document>,
    /// Human-readable detail, mostly for failures
    pub message: Option<String>,
}

impl ScrapeOutcome {
    pub fn is_ok(&self) -> bool {
        self.status == ScrapeStatus::Ok
    }

    fn failure(url: String, status: ScrapeStatus, message: String) -> Self {
        ScrapeOutcome {
            url,
            status,
            document: None,
            message: Some(message),
        }
    }
}

// Options for a single scrape call
//
// Shared between the scrape and batch subcommands so both go through
// the exact same request-building path.
#[derive(Debug, Clone)]
pub struct ScrapeOptions {
    /// Output formats to request (at least one)
    pub formats: Vec<Format>,
    /// Strip navigation/boilerplate on the service side
    pub only_main_content: bool,
    /// Service-side time budget for the scrape
    pub timeout: Option<Duration>,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        ScrapeOptions {
            formats: vec![Format::Markdown],
            only_main_content: true,
            timeout: None,
        }
    }
}

// The client for the scraping service
//
// Holds the connection pool, the endpoint and the credential. Clone is
// cheap, so the batch runner clones one of these per concurrent task.
#[derive(Debug, Clone)]
pub struct ScrapeClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ScrapeClient {
    // Creates a client authenticated with the given API key
    //
    // The client-side timeout sits a little above the service-side budget
    // so that when a page is slow, we surface the service's timeout error
    // (which names the page) instead of cutting the connection ourselves.
    pub fn new(api_key: impl Into<String>, request_timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout + Duration::from_secs(5))
            .build()?;

        Ok(ScrapeClient {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Points the client at a different endpoint (self-hosted deployments)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    // Scrapes a single URL
    //
    // This is the one suspend point per scrape: POST the request, await
    // the response, classify what came back. Never panics and never
    // returns Err - every failure mode becomes a ScrapeOutcome.
    pub async fn scrape(&self, url: &str, options: &ScrapeOptions) -> ScrapeOutcome {
        let request = ScrapeRequest {
            url: url.to_string(),
            formats: options.formats.clone(),
            only_main_content: options.only_main_content,
            // The wire field is milliseconds
            timeout: options.timeout.map(|t| t.as_millis() as u64),
        };

        let result = self
            .http
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await;

        match result {
            Ok(response) => {
                let status_code = response.status();
                match response.text().await {
                    Ok(body) => outcome_from_response(url, status_code, &body),
                    Err(e) => ScrapeOutcome::failure(
                        url.to_string(),
                        ScrapeStatus::NetworkError,
                        format!("Failed to read response body: {}", e),
                    ),
                }
            }
            Err(e) => categorize_error(url, e),
        }
    }
}

// Turns an HTTP response (status code + raw body) into an outcome
//
// Kept separate from the async request path so it can be unit tested
// without a live server.
fn outcome_from_response(url: &str, status_code: StatusCode, body: &str) -> ScrapeOutcome {
    // The service wraps both successes and failures in the same envelope,
    // so try to parse it regardless of the HTTP status.
    let envelope: Option<ScrapeEnvelope> = serde_json::from_str(body).ok();

    if status_code.is_success() {
        return match envelope {
            Some(ScrapeEnvelope {
                success: true,
                data: Some(document),
                ..
            }) => ScrapeOutcome {
                url: url.to_string(),
                status: ScrapeStatus::Ok,
                document: Some(document),
                message: None,
            },
            // HTTP 200 but the envelope says otherwise (or has no data)
            Some(envelope) => ScrapeOutcome::failure(
                url.to_string(),
                ScrapeStatus::InvalidResponse,
                envelope
                    .error
                    .unwrap_or_else(|| "Service reported failure without detail".to_string()),
            ),
            None => ScrapeOutcome::failure(
                url.to_string(),
                ScrapeStatus::InvalidResponse,
                "Response body was not valid JSON".to_string(),
            ),
        };
    }

    // Non-2xx: classify by status code, preferring the service's own
    // error message over a bare status line when the envelope parsed.
    let detail = envelope
        .and_then(|e| e.error)
        .unwrap_or_else(|| format!("HTTP {}", status_code.as_u16()));

    let status = match status_code {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ScrapeStatus::AuthError,
        StatusCode::TOO_MANY_REQUESTS => ScrapeStatus::RateLimited,
        code if code.is_client_error() => ScrapeStatus::BadRequest,
        code if code.is_server_error() => ScrapeStatus::ServerError,
        _ => ScrapeStatus::InvalidResponse,
    };

    ScrapeOutcome::failure(url.to_string(), status, detail)
}

// Categorizes transport-level failures from reqwest
//
// These are the cases where no HTTP response ever arrived (or arrived
// too late): timeouts, DNS failures, refused connections, TLS problems.
fn categorize_error(url: &str, error: reqwest::Error) -> ScrapeOutcome {
    let (status, message) = if error.is_timeout() {
        (ScrapeStatus::Timeout, "Request timed out".to_string())
    } else if error.is_connect() {
        (
            ScrapeStatus::NetworkError,
            format!("Could not reach the service: {}", error),
        )
    } else if error.is_decode() {
        (ScrapeStatus::InvalidResponse, error.to_string())
    } else {
        (ScrapeStatus::NetworkError, error.to_string())
    };

    ScrapeOutcome::failure(url.to_string(), status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com";

    #[test]
    fn test_success_response_yields_document() {
        let body = r##"{"success": true, "data": {"markdown": "# Hello"}}"##;
        let outcome = outcome_from_response(URL, StatusCode::OK, body);

        assert!(outcome.is_ok());
        assert_eq!(
            outcome.document.unwrap().markdown.as_deref(),
            Some("# Hello")
        );
        assert!(outcome.message.is_none());
    }

    #[test]
    fn test_http_200_with_failure_envelope() {
        let body = r#"{"success": false, "error": "Page could not be rendered"}"#;
        let outcome = outcome_from_response(URL, StatusCode::OK, body);

        assert_eq!(outcome.status, ScrapeStatus::InvalidResponse);
        assert_eq!(outcome.message.as_deref(), Some("Page could not be rendered"));
        assert!(outcome.document.is_none());
    }

    #[test]
    fn test_http_200_with_garbage_body() {
        let outcome = outcome_from_response(URL, StatusCode::OK, "<html>nope</html>");
        assert_eq!(outcome.status, ScrapeStatus::InvalidResponse);
    }

    #[test]
    fn test_unauthorized_is_auth_error() {
        let body = r#"{"success": false, "error": "Invalid API key"}"#;
        let outcome = outcome_from_response(URL, StatusCode::UNAUTHORIZED, body);

        assert_eq!(outcome.status, ScrapeStatus::AuthError);
        // The service message wins over a bare "HTTP 401"
        assert_eq!(outcome.message.as_deref(), Some("Invalid API key"));
    }

    #[test]
    fn test_forbidden_is_auth_error() {
        let outcome = outcome_from_response(URL, StatusCode::FORBIDDEN, "");
        assert_eq!(outcome.status, ScrapeStatus::AuthError);
        assert_eq!(outcome.message.as_deref(), Some("HTTP 403"));
    }

    #[test]
    fn test_rate_limit_is_classified() {
        let outcome = outcome_from_response(URL, StatusCode::TOO_MANY_REQUESTS, "");
        assert_eq!(outcome.status, ScrapeStatus::RateLimited);
    }

    #[test]
    fn test_client_and_server_errors_split() {
        let bad = outcome_from_response(URL, StatusCode::UNPROCESSABLE_ENTITY, "");
        assert_eq!(bad.status, ScrapeStatus::BadRequest);

        let broken = outcome_from_response(URL, StatusCode::BAD_GATEWAY, "");
        assert_eq!(broken.status, ScrapeStatus::ServerError);
    }

    #[test]
    fn test_client_builds_and_points_elsewhere() {
        let client = ScrapeClient::new("test-key", Duration::from_secs(30))
            .unwrap()
            .with_base_url("http://localhost:3002");
        assert_eq!(client.base_url, "http://localhost:3002");
    }
}
