// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes. Each subcommand gets its own Args struct
// so the handlers in main.rs can take one value instead of seven.
//
// Credential resolution: --api-key is a global flag; when it's absent,
// main.rs falls back to the PAGEMARK_API_KEY environment variable.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::api::Format;

#[derive(Parser, Debug)]
#[command(
    name = "pagemark",
    version = "0.1.0",
    about = "A CLI tool that scrapes web pages into markdown via a hosted scraping API",
    long_about = "pagemark asks a hosted scraping service to fetch a page, render it, and hand it \
                  back converted to markdown (or other formats). Use it to turn documentation \
                  pages into local markdown files, one at a time or in batches."
)]
pub struct Cli {
    /// API key for the scraping service (falls back to $PAGEMARK_API_KEY)
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Base URL of the scraping API, for self-hosted deployments
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scrape a single URL and print (or save) the result
    ///
    /// Example: pagemark scrape https://example.com
    Scrape(ScrapeArgs),

    /// Scrape every URL listed in a file, concurrently
    ///
    /// Example: pagemark batch urls.txt --concurrency 10 --output-dir pages/
    Batch(BatchArgs),
}

#[derive(Args, Debug)]
pub struct ScrapeArgs {
    /// URL of the page to scrape (e.g., https://example.com)
    pub url: String,

    /// Output format to request; repeat the flag for several at once
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: Vec<Format>,

    /// Print the full response document as JSON instead of the bare body
    #[arg(long)]
    pub json: bool,

    /// Write the result (body, or full JSON with --json) to this file
    /// instead of standard output
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Scrape the whole page instead of just the main content
    ///
    /// By default the service strips navigation, footers and other
    /// boilerplate before converting.
    #[arg(long)]
    pub full_page: bool,

    /// Per-request time budget in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// After scraping, list the unique http(s) links found in the markdown
    #[arg(long)]
    pub links: bool,
}

#[derive(Args, Debug)]
pub struct BatchArgs {
    /// File with one URL per line ('#' comments and blank lines are skipped)
    pub file: PathBuf,

    /// Maximum number of scrape requests in flight at once
    #[arg(long, default_value_t = 5)]
    pub concurrency: usize,

    /// Output format to request; repeat the flag for several at once
    #[arg(long, value_enum, default_value = "markdown")]
    pub format: Vec<Format>,

    /// Print the summary as JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Save each page's markdown into this directory (created if missing)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Scrape whole pages instead of just the main content
    #[arg(long)]
    pub full_page: bool,

    /// Per-request time budget in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}
