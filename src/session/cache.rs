// src/session/cache.rs
// =============================================================================
// The session report cache: which hrefs have already been reported for
// which route during this run.
//
// Shape: route -> [href, href, ...]
// - keys are unique per route
// - the list for a route never holds the same href twice, as long as every
//   writer calls already_reported() before record()
// - nothing is ever removed; the cache lives exactly as long as the Session
//
// Rust concepts:
// - Arc<DashMap>: a concurrent map we can clone cheaply and share
// - Entry API: insert-or-update in one lookup
// =============================================================================

use dashmap::DashMap;
use std::sync::Arc;

/// Route -> hrefs already reported for that route.
///
/// Cloning shares the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct ReportCache {
    inner: Arc<DashMap<String, Vec<String>>>,
}

impl ReportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff `href` was already recorded for `route` (exact string match).
    pub fn already_reported(&self, route: &str, href: &str) -> bool {
        self.inner
            .get(route)
            .map(|links| links.iter().any(|link| link == href))
            .unwrap_or(false)
    }

    /// Appends `href` to the route's list and returns the whole list.
    ///
    /// Callers check `already_reported` first; this does not dedupe on its own.
    pub(crate) fn record(&self, route: &str, href: &str) -> Vec<String> {
        let mut links = self.inner.entry(route.to_string()).or_default();
        links.push(href.to_string());
        links.clone()
    }

    /// All routes with their reported hrefs, sorted by route.
    pub fn snapshot(&self) -> Vec<(String, Vec<String>)> {
        let mut routes: Vec<_> = self
            .inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        routes.sort_by(|a, b| a.0.cmp(&b.0));
        routes
    }

    /// Total number of hrefs reported across all routes.
    pub fn len(&self) -> usize {
        self.inner.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_cache_reports_nothing() {
        let cache = ReportCache::new();
        assert!(!cache.already_reported("/docs", "https://x.test/a"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_record_then_lookup() {
        let cache = ReportCache::new();
        cache.record("/docs", "https://x.test/a");

        assert!(cache.already_reported("/docs", "https://x.test/a"));
        assert!(!cache.already_reported("/docs", "https://x.test/b"));
    }

    #[test]
    fn test_routes_are_isolated() {
        let cache = ReportCache::new();
        cache.record("/a", "https://x.test/dead");

        assert!(cache.already_reported("/a", "https://x.test/dead"));
        assert!(!cache.already_reported("/b", "https://x.test/dead"));
    }

    #[test]
    fn test_record_returns_accumulated_links() {
        let cache = ReportCache::new();
        assert_eq!(cache.record("/a", "one"), vec!["one"]);
        assert_eq!(cache.record("/a", "two"), vec!["one", "two"]);
        assert_eq!(cache.record("/b", "three"), vec!["three"]);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_exact_string_match() {
        let cache = ReportCache::new();
        cache.record("/a", "https://x.test/dead");

        // A trailing slash is a different href
        assert!(!cache.already_reported("/a", "https://x.test/dead/"));
    }

    #[test]
    fn test_clones_share_state() {
        let cache = ReportCache::new();
        let other = cache.clone();
        other.record("/a", "link");
        assert!(cache.already_reported("/a", "link"));
    }

    #[test]
    fn test_snapshot_sorted_by_route() {
        let cache = ReportCache::new();
        cache.record("/z", "1");
        cache.record("/a", "2");

        let snapshot = cache.snapshot();
        assert_eq!(snapshot[0].0, "/a");
        assert_eq!(snapshot[1].0, "/z");
    }
}
