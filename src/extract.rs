// src/extract.rs
// =============================================================================
// This module extracts links from scraped markdown (the --links flag).
//
// The service hands us CommonMark, and `pulldown-cmark` parses it into a
// stream of events (heading starts, text runs, link starts, ...). We walk
// that stream and collect the destination of every link event.
//
// Filtering rules:
// - http/https destinations only (no mailto:, tel:, javascript:)
// - relative links are dropped (the scrape flattened the page, so we have
//   nothing to resolve them against)
// - duplicates are dropped, first occurrence wins
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use std::collections::HashSet;

// Extracts the unique HTTP/HTTPS link targets from markdown text
//
// Both inline links ([text](url)) and autolinks (<https://...>) show up
// as Link events, so one match arm covers them. Images are deliberately
// not collected - an <img> source isn't a page you'd scrape next.
pub fn extract_markdown_links(markdown: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    for event in Parser::new(markdown) {
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            let url = dest_url.to_string();

            if is_http_link(&url) && seen.insert(url.clone()) {
                links.push(url);
            }
        }
    }

    links
}

// Keeps only absolute web links
fn is_http_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why collect into a Vec AND a HashSet?
//    - The HashSet gives O(1) "have we seen this?" checks
//    - The Vec preserves the order links appeared on the page
//    - seen.insert() returns false for duplicates, so the && short-circuits
//
// 2. What is CowStr (the type of dest_url)?
//    - A "clone on write" string from pulldown-cmark
//    - It borrows from the source text when it can, allocates when it must
//    - .to_string() converts it to an owned String either way
// -----------------------------------------------------------------------------
