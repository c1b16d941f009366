// src/batch/list.rs
// =============================================================================
// This module reads the URL list file for the batch subcommand.
//
// File format (one URL per line):
//   # comment lines start with a hash
//   https://example.com
//   https://example.com/about
//
//   (blank lines are ignored)
//
// Lines that aren't http(s) URLs are skipped with a warning rather than
// aborting the whole batch - one typo shouldn't cost you the other
// ninety-nine scrapes.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use url::Url;

// Reads and filters a URL list file
//
// Returns the usable URLs in file order. Errors only if the file can't
// be read or contains no usable URLs at all.
pub fn read_url_list(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read URL list: {}", path.display()))?;

    let mut urls = Vec::new();

    for (line_number, line) in parse_url_list(&content) {
        if is_http_url(&line) {
            urls.push(line);
        } else {
            eprintln!(
                "Warning: skipping line {} (not an http/https URL): {}",
                line_number, line
            );
        }
    }

    if urls.is_empty() {
        return Err(anyhow!(
            "No usable URLs found in {}",
            path.display()
        ));
    }

    Ok(urls)
}

// Extracts candidate lines from the file content
//
// Skips blank lines and '#' comments, trims whitespace, and keeps the
// 1-based line number for warning messages.
pub fn parse_url_list(content: &str) -> Vec<(usize, String)> {
    content
        .lines()
        .enumerate()
        .filter_map(|(index, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                None
            } else {
                Some((index + 1, line.to_string()))
            }
        })
        .collect()
}

/// True if the string parses as a URL with an http or https scheme
pub fn is_http_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.scheme() == "http" || url.scheme() == "https",
        Err(_) => false,
    }
}

// Derives a filesystem-safe markdown filename from a URL
//
// "https://example.com/docs/intro" -> "example.com-docs-intro.md"
// Used by batch --output-dir so every scraped page lands in its own file.
pub fn filename_for_url(url: &str) -> String {
    let trimmed = url
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/');

    let mut slug = String::new();
    let mut last_was_dash = false;

    for c in trimmed.chars() {
        if c.is_ascii_alphanumeric() || c == '.' {
            slug.push(c);
            last_was_dash = false;
        } else if !last_was_dash {
            // Runs of separators collapse into a single dash
            slug.push('-');
            last_was_dash = true;
        }
    }

    let slug = slug.trim_matches('-');

    // Keep filenames reasonable even for very long query-string URLs
    let slug: String = slug.chars().take(120).collect();

    if slug.is_empty() {
        "page.md".to_string()
    } else {
        format!("{}.md", slug)
    }
}

// Like filename_for_url, but never reuses a name within one batch
//
// Slugging is lossy ("/a-b" and "/a/b" both slug to "a-b"), so without
// this a later page would silently overwrite an earlier one in
// --output-dir. Collisions get a counter suffix: a-b.md, a-b-2.md, ...
pub fn unique_filename_for_url(url: &str, used: &mut HashSet<String>) -> String {
    let base = filename_for_url(url);

    if used.insert(base.clone()) {
        return base;
    }

    let stem = base.trim_end_matches(".md");
    let mut counter = 2;

    loop {
        let candidate = format!("{}-{}.md", stem, counter);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "\
# production pages
https://example.com

https://example.com/about
  # indented comment
";
        let lines = parse_url_list(content);
        assert_eq!(
            lines,
            vec![
                (2, "https://example.com".to_string()),
                (4, "https://example.com/about".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let lines = parse_url_list("  https://example.com  \n");
        assert_eq!(lines, vec![(1, "https://example.com".to_string())]);
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("https://example.com"));
        assert!(is_http_url("http://example.com/path?q=1"));
        assert!(!is_http_url("ftp://example.com"));
        assert!(!is_http_url("example.com"));
        assert!(!is_http_url("not a url"));
    }

    #[test]
    fn test_filename_for_url() {
        assert_eq!(
            filename_for_url("https://example.com/docs/intro"),
            "example.com-docs-intro.md"
        );
        assert_eq!(filename_for_url("https://example.com/"), "example.com.md");
        assert_eq!(
            filename_for_url("https://example.com/a?b=c&d=e"),
            "example.com-a-b-c-d-e.md"
        );
    }

    #[test]
    fn test_filename_never_empty() {
        assert_eq!(filename_for_url("https://"), "page.md");
    }

    #[test]
    fn test_unique_filename_counts_up_on_collision() {
        // All three URLs are distinct pages but slug identically
        let mut used = HashSet::new();
        assert_eq!(
            unique_filename_for_url("https://example.com/a-b", &mut used),
            "example.com-a-b.md"
        );
        assert_eq!(
            unique_filename_for_url("https://example.com/a/b", &mut used),
            "example.com-a-b-2.md"
        );
        assert_eq!(
            unique_filename_for_url("https://example.com/a?b", &mut used),
            "example.com-a-b-3.md"
        );
    }

    #[test]
    fn test_unique_filename_leaves_distinct_slugs_alone() {
        let mut used = HashSet::new();
        assert_eq!(
            unique_filename_for_url("https://example.com/intro", &mut used),
            "example.com-intro.md"
        );
        assert_eq!(
            unique_filename_for_url("https://example.com/setup", &mut used),
            "example.com-setup.md"
        );
    }
}
