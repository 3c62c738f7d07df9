// src/checker/mod.rs
// =============================================================================
// This module decides which links are broken and who gets told about it.
//
// Submodules:
// - report: the Reporter, posts broken links to the webhook once per session
// - deliveries: webhook POSTs running in the background
// - probe: the Prober, HEAD-checks external links and feeds the Reporter
// - monitor: LinkMonitor, the fire-and-forget calls navigation code uses
// - html: pulls <a href> links out of a page
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::LinkMonitor` instead of
// `checker::monitor::LinkMonitor`.
// =============================================================================

mod deliveries;
mod html;
mod monitor;
mod probe;
mod report;

pub use html::extract_page_links;
pub use monitor::LinkMonitor;
pub use report::{BrokenLinkReport, Reporter};
