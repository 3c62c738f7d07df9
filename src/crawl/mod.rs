// src/crawl/mod.rs
// =============================================================================
// This module walks a website the way a visitor would and drives the link
// monitor from each page it lands on.
//
// Features:
// - Breadth-first navigation starting from a URL
// - Respects same-host restriction (never navigates to external sites)
// - Configurable depth limit
// - Polite crawling with delays between pages
// =============================================================================

mod queue;

pub use queue::{crawl_website, CrawlOptions, CrawlSummary};
