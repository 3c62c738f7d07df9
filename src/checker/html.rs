// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages and sorts them by where they
// point.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to:
// - Resolve relative hrefs against the page URL
// - Compare hosts, so we know which links stay on the site
//
// Output:
// - internal: same host as the page -> pages to navigate to next
// - external: any other host        -> links to probe with HEAD
// =============================================================================

use scraper::{Html, Selector};
use url::Url;

/// Links found on one page, deduplicated, in document order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageLinks {
    pub internal: Vec<Url>,
    pub external: Vec<Url>,
}

/// Extracts every http(s) `<a href>` on the page.
///
/// Example:
///   page = "https://example.com/docs/"
///   `<a href="intro">`              -> internal https://example.com/docs/intro
///   `<a href="https://rust-lang.org">` -> external https://rust-lang.org/
pub fn extract_page_links(html: &str, page: &Url) -> PageLinks {
    let mut links = PageLinks::default();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };
    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        let Some(url) = resolve_href(page, href) else {
            continue;
        };

        let bucket = if url.host_str() == page.host_str() {
            &mut links.internal
        } else {
            &mut links.external
        };
        if !bucket.contains(&url) {
            bucket.push(url);
        }
    }

    links
}

// Resolves an href against the page, dropping anything we can't check
//
// Skipped:
// - "#section" anchors (same page)
// - mailto:, tel:, javascript:, data:, file: ... (not http)
fn resolve_href(page: &Url, href: &str) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = page.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    // "/docs#install" and "/docs" are the same page
    url.set_fragment(None);
    Some(url)
}
