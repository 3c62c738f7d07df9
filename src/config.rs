// src/config.rs
// =============================================================================
// Runtime configuration for the reporter and prober.
//
// Everything here is resolved once at start-up (from CLI flags or the
// BROKEN_LINK_WEBHOOK environment variable, see cli.rs) and never changes
// while the session runs.
//
// The webhook is the only setting that changes behaviour in a big way:
// - Some(url) = broken links are POSTed to url
// - None      = reporting is silently disabled (probing still happens)
// =============================================================================

use std::time::Duration;

/// How long a scan waits on any one request, and on pending reports at the
/// end of a run, unless --timeout-secs says otherwise.
pub const DEFAULT_WAIT_LIMIT: Duration = Duration::from_secs(10);

/// Settings shared by the reporter, the prober and the HTTP transport.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Where broken-link reports are delivered. `None` disables reporting.
    pub webhook: Option<String>,
    /// Per-request timeout. `None` means requests may hang forever.
    pub request_timeout: Option<Duration>,
    /// Only probe when the route's scheme matches the active page's scheme.
    pub match_scheme: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            webhook: None,
            request_timeout: None,
            match_scheme: true,
        }
    }
}

impl ReporterConfig {
    /// Creates a config for the given webhook.
    ///
    /// A blank value (empty or whitespace only) is treated exactly like an
    /// absent one, the same way an unset environment variable would be.
    /// Anything else is used exactly as given.
    pub fn new(webhook: Option<String>) -> Self {
        let webhook = webhook.filter(|w| !w.trim().is_empty());

        Self {
            webhook,
            ..Self::default()
        }
    }

    pub fn with_timeout_secs(mut self, secs: Option<u64>) -> Self {
        self.request_timeout = secs.map(Duration::from_secs);
        self
    }

    pub fn with_scheme_check(mut self, enabled: bool) -> Self {
        self.match_scheme = enabled;
        self
    }

    /// Upper bound for waits that must not hang: the configured request
    /// timeout, or DEFAULT_WAIT_LIMIT.
    pub fn wait_limit(&self) -> Duration {
        self.request_timeout.unwrap_or(DEFAULT_WAIT_LIMIT)
    }

    /// True when a webhook is configured.
    pub fn reporting_enabled(&self) -> bool {
        self.webhook.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_webhook_disables_reporting() {
        assert!(!ReporterConfig::new(None).reporting_enabled());
        assert!(!ReporterConfig::new(Some(String::new())).reporting_enabled());
        assert!(!ReporterConfig::new(Some("   ".to_string())).reporting_enabled());
    }

    #[test]
    fn test_webhook_is_passed_through_unchanged() {
        let config = ReporterConfig::new(Some(" https://hooks.test/links?sig=a%20b ".to_string()));
        assert_eq!(config.webhook.as_deref(), Some(" https://hooks.test/links?sig=a%20b "));
        assert!(config.reporting_enabled());
    }

    #[test]
    fn test_defaults() {
        let config = ReporterConfig::new(None);
        assert!(config.match_scheme);
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.wait_limit(), DEFAULT_WAIT_LIMIT);
    }

    #[test]
    fn test_builder_methods() {
        let config = ReporterConfig::new(None)
            .with_timeout_secs(Some(3))
            .with_scheme_check(false);
        assert_eq!(config.request_timeout, Some(Duration::from_secs(3)));
        assert_eq!(config.wait_limit(), Duration::from_secs(3));
        assert!(!config.match_scheme);
    }
}
