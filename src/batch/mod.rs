// src/batch/mod.rs
// =============================================================================
// This module handles batch scraping: many URLs, one summary.
//
// Submodules:
// - list: Reads and filters the URL list file
// - runner: Runs the scrapes concurrently and shapes the summary rows
// =============================================================================

mod list;
mod runner;

pub use list::{filename_for_url, is_http_url, read_url_list, unique_filename_for_url};
pub use runner::{scrape_all, ScrapeReport};
