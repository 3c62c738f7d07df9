// src/session/mod.rs
// =============================================================================
// Everything that lives for exactly one session (one run of the tool).
//
// Submodules:
// - cache: routes and the hrefs already reported for them
// - ledger: per-link probe state
// - page: the page the user is currently on
//
// A Session is a plain value: create one, hand clones to the reporter and
// prober, drop it when you are done. Two sessions never share anything, so
// tests can build as many isolated ones as they like.
// =============================================================================

mod cache;
mod ledger;
mod page;

pub use cache::ReportCache;
pub use ledger::{ProbeLedger, ProbeState};
pub use page::ActivePage;

use url::Url;

#[derive(Debug, Clone)]
pub struct Session {
    pub reports: ReportCache,
    pub probes: ProbeLedger,
    pub page: ActivePage,
}

impl Session {
    /// Starts an empty session with the user on `location`.
    pub fn new(location: Url) -> Self {
        Self {
            reports: ReportCache::new(),
            probes: ProbeLedger::new(),
            page: ActivePage::new(location),
        }
    }
}
