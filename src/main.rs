// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Resolve the API key (flag, then environment variable)
// 3. Dispatch to the scrape or batch handler
// 4. Print results and exit with a proper code
//
// Exit codes:
//   0 = scrape(s) succeeded
//   1 = one or more scrapes failed (service said no, page unreachable, ...)
//   2 = local error (missing API key, unreadable URL file, bad URL, ...)
//
// Output discipline: scraped content goes to standard output, failure
// messages go to standard error. A successful single scrape writes
// nothing to stderr; a failed one writes nothing more to stdout. That
// keeps `pagemark scrape url > page.md` safe to pipe.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod api; // src/api/ - client for the scraping service
mod batch; // src/batch/ - concurrent multi-URL scraping
mod cli; // src/cli.rs - command-line parsing
mod extract; // src/extract.rs - link extraction from scraped markdown

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use url::Url;

use api::{Format, ScrapeClient, ScrapeOptions, ScrapeStatus};
use batch::ScrapeReport;
use cli::{BatchArgs, Cli, Commands, ScrapeArgs};

/// Environment variable consulted when --api-key is not given
const API_KEY_ENV: &str = "PAGEMARK_API_KEY";

#[tokio::main]
async fn main() {
    // Run our application logic and capture the exit code
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Local/unexpected error: print it and exit with code 2
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let api_key = resolve_api_key(cli.api_key)?;

    match cli.command {
        Commands::Scrape(args) => handle_scrape(api_key, cli.api_url, args).await,
        Commands::Batch(args) => handle_batch(api_key, cli.api_url, args).await,
    }
}

// Finds the API key: the --api-key flag wins, then the environment
//
// An empty value counts as missing so `PAGEMARK_API_KEY= pagemark ...`
// doesn't send a blank bearer token over the wire.
fn resolve_api_key(flag: Option<String>) -> Result<String> {
    flag.or_else(|| std::env::var(API_KEY_ENV).ok())
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| anyhow!("No API key given: pass --api-key or set {}", API_KEY_ENV))
}

// Builds the service client, pointing it at --api-url when given
fn build_client(
    api_key: String,
    api_url: Option<String>,
    timeout_secs: u64,
) -> Result<ScrapeClient> {
    let client = ScrapeClient::new(api_key, Duration::from_secs(timeout_secs))?;

    Ok(match api_url {
        Some(base_url) => client.with_base_url(base_url),
        None => client,
    })
}

// Rejects URLs we know the service can't scrape before spending a request
fn ensure_scrapable(url: &str) -> Result<()> {
    let parsed = Url::parse(url).map_err(|e| anyhow!("Invalid URL '{}': {}", url, e))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(anyhow!(
            "Unsupported URL scheme '{}': only http and https can be scraped",
            parsed.scheme()
        ));
    }

    Ok(())
}

// Handles the 'scrape' subcommand: one URL, one request, one result
async fn handle_scrape(api_key: String, api_url: Option<String>, args: ScrapeArgs) -> Result<i32> {
    ensure_scrapable(&args.url)?;

    // --links walks the markdown body, so make sure we ask for one
    let mut formats = args.format.clone();
    if args.links && !formats.contains(&Format::Markdown) {
        formats.push(Format::Markdown);
    }

    let client = build_client(api_key, api_url, args.timeout)?;
    let options = ScrapeOptions {
        formats,
        only_main_content: !args.full_page,
        timeout: Some(Duration::from_secs(args.timeout)),
    };

    let outcome = client.scrape(&args.url, &options).await;

    if !outcome.is_ok() {
        eprintln!(
            "Scrape failed: {}",
            outcome.message.as_deref().unwrap_or("no detail from service")
        );
        return Ok(1);
    }

    // An Ok status always carries a document (the client guarantees it),
    // but a missing one is a local bug worth surfacing loudly.
    let document = outcome
        .document
        .ok_or_else(|| anyhow!("Service reported success but returned no document"))?;

    // Render first, then route: --output gets the same bytes stdout
    // would have gotten, JSON or not.
    let rendered = render_document(&document, args.json, args.format[0])?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => println!("{}", rendered),
    }

    if args.links {
        let markdown = document.markdown.as_deref().unwrap_or_default();
        for link in extract::extract_markdown_links(markdown) {
            println!("{}", link);
        }
    }

    Ok(0)
}

// Renders a scraped document for printing or saving
//
// With --json the whole document is dumped; otherwise the body of the
// primary format (the first --format on the command line) is used.
fn render_document(document: &api::Document, json: bool, primary: Format) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(document)?)
    } else {
        Ok(document.body_for(primary).unwrap_or_default())
    }
}

// Handles the 'batch' subcommand: a file of URLs, scraped concurrently
async fn handle_batch(api_key: String, api_url: Option<String>, args: BatchArgs) -> Result<i32> {
    let urls = batch::read_url_list(&args.file)?;

    println!("📄 {} URL(s) to scrape", urls.len());

    // Saving implies we need a markdown body back for every page
    let mut formats = args.format.clone();
    if args.output_dir.is_some() && !formats.contains(&Format::Markdown) {
        formats.push(Format::Markdown);
    }

    if let Some(dir) = &args.output_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    let client = build_client(api_key, api_url, args.timeout)?;
    let options = ScrapeOptions {
        formats,
        only_main_content: !args.full_page,
        timeout: Some(Duration::from_secs(args.timeout)),
    };

    println!(
        "🌐 Scraping with up to {} request(s) in flight...\n",
        args.concurrency
    );

    let outcomes = batch::scrape_all(&client, urls, &options, args.concurrency).await;

    // Save bodies first (when asked to), then shape the summary rows
    let mut reports = Vec::new();
    let mut used_filenames = std::collections::HashSet::new();
    for outcome in &outcomes {
        let saved_to = match (&args.output_dir, &outcome.document) {
            (Some(dir), Some(document)) => match &document.markdown {
                Some(markdown) => {
                    let filename =
                        batch::unique_filename_for_url(&outcome.url, &mut used_filenames);
                    let path = dir.join(filename);
                    std::fs::write(&path, markdown)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    Some(path.display().to_string())
                }
                None => None,
            },
            _ => None,
        };

        reports.push(ScrapeReport::from_outcome(outcome, saved_to));
    }

    print_reports(&reports, args.json)?;

    // Any failed page makes the whole batch exit 1 (CI-friendly)
    let failed_count = reports.iter().filter(|r| !r.is_ok()).count();

    if failed_count > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the batch summary either as a table or JSON
fn print_reports(reports: &[ScrapeReport], json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(reports)?;
        println!("{}", json_output);
    } else {
        print_table(reports);
    }
    Ok(())
}

// Prints the batch summary as a human-readable table in the terminal
fn print_table(reports: &[ScrapeReport]) {
    println!("{:<60} {:<22} {:<40}", "URL", "STATUS", "DETAIL");
    println!("{}", "=".repeat(122));

    for report in reports {
        let status_display = format_status(&report.status);

        // Successful rows show the page title and size; failed rows show
        // the failure message.
        let detail = if report.is_ok() {
            let title = report.title.as_deref().unwrap_or("(untitled)");
            let bytes = report.markdown_bytes.unwrap_or(0);
            format!("{} ({} bytes)", title, bytes)
        } else {
            report.message.clone().unwrap_or_default()
        };

        let url_display = truncate_for_display(&report.url);

        println!("{:<60} {:<22} {:<40}", url_display, status_display, detail);
    }

    println!();

    let ok_count = reports.iter().filter(|r| r.is_ok()).count();
    let failed_count = reports.len() - ok_count;

    println!("📊 Summary:");
    println!("   ✅ Scraped: {}", ok_count);
    println!("   ❌ Failed: {}", failed_count);
    println!("   📋 Total: {}", reports.len());
}

// Truncates a URL so the table columns line up
//
// Counts characters, not bytes: slicing at a fixed byte offset panics
// on multi-byte characters, and internationalized domains are valid
// batch input.
fn truncate_for_display(url: &str) -> String {
    match url.char_indices().nth(57) {
        Some((byte_index, _)) => format!("{}...", &url[..byte_index]),
        None => url.to_string(),
    }
}

// Formats the status enum for the summary table
fn format_status(status: &ScrapeStatus) -> String {
    match status {
        ScrapeStatus::Ok => "✅ OK".to_string(),
        ScrapeStatus::AuthError => "🔑 AUTH ERROR".to_string(),
        ScrapeStatus::RateLimited => "🐢 RATE LIMITED".to_string(),
        ScrapeStatus::BadRequest => "🚫 BAD REQUEST".to_string(),
        ScrapeStatus::ServerError => "💥 SERVER ERROR".to_string(),
        ScrapeStatus::Timeout => "⏱️  TIMEOUT".to_string(),
        ScrapeStatus::NetworkError => "🌐 NETWORK ERROR".to_string(),
        ScrapeStatus::InvalidResponse => "⚠️  BAD RESPONSE".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_api_key_prefers_flag() {
        let key = resolve_api_key(Some("fc-from-flag".to_string())).unwrap();
        assert_eq!(key, "fc-from-flag");
    }

    #[test]
    fn test_resolve_api_key_rejects_blank_flag_without_env() {
        // A whitespace-only flag must not become a bearer token
        std::env::remove_var(API_KEY_ENV);
        assert!(resolve_api_key(Some("   ".to_string())).is_err());
        assert!(resolve_api_key(None).is_err());
    }

    #[test]
    fn test_truncate_for_display_short_url_unchanged() {
        assert_eq!(
            truncate_for_display("https://example.com"),
            "https://example.com"
        );
    }

    #[test]
    fn test_truncate_for_display_long_ascii_url() {
        let url = format!("https://example.com/{}", "a".repeat(80));
        let display = truncate_for_display(&url);
        assert!(display.ends_with("..."));
        assert_eq!(display.chars().count(), 60);
    }

    #[test]
    fn test_truncate_for_display_multibyte_url() {
        // Internationalized hostnames put multi-byte characters right
        // where a byte-offset slice would land - must truncate, not panic
        let url = format!("https://{}.example/x", "é".repeat(40));
        let display = truncate_for_display(&url);
        assert!(display.ends_with("..."));
        assert_eq!(display.chars().count(), 60);
    }

    #[test]
    fn test_render_document_body() {
        let document = api::Document {
            markdown: Some("# Hi".to_string()),
            ..api::Document::default()
        };
        let rendered = render_document(&document, false, Format::Markdown).unwrap();
        assert_eq!(rendered, "# Hi");
    }

    #[test]
    fn test_render_document_json() {
        let document = api::Document {
            markdown: Some("# Hi".to_string()),
            ..api::Document::default()
        };
        let rendered = render_document(&document, true, Format::Markdown).unwrap();

        // The JSON dump is what --output receives too, so it has to be
        // the real document, parseable on the other end
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["markdown"], "# Hi");
    }

    #[test]
    fn test_ensure_scrapable() {
        assert!(ensure_scrapable("https://example.com").is_ok());
        assert!(ensure_scrapable("http://example.com/a/b").is_ok());
        assert!(ensure_scrapable("ftp://example.com").is_err());
        assert!(ensure_scrapable("example.com").is_err());
    }
}
