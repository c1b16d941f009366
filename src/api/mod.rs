// src/api/mod.rs
// =============================================================================
// This module is the client for the hosted scraping API.
//
// Submodules:
// - client: Builds requests, sends them, classifies failures
// - model: The JSON wire format (requests, response envelope, documents)
//
// This file (mod.rs) is the module root - it re-exports the public API so
// the rest of the application can write `api::ScrapeClient` instead of
// `api::client::ScrapeClient`.
// =============================================================================

mod client;
mod model;

pub use client::{ScrapeClient, ScrapeOptions, ScrapeOutcome, ScrapeStatus, DEFAULT_BASE_URL};
pub use model::{Document, Format, Metadata, ScrapeEnvelope, ScrapeRequest};
