// src/checker/probe.rs
// =============================================================================
// The Prober: checks an external link with a HEAD request and hands broken
// ones to the Reporter.
//
// Steps for probe(route, href):
// 1. Already reported for the route?                -> skip
// 2. route is an absolute URL with a different
//    scheme than the current page (http vs https)?   -> skip, not recorded
// 3. Already probed this session?                   -> skip
// 4. HEAD href and look only at the status code:
//    - >= 400  -> mark it Reported, then hand the report off in the
//                 background, attributed to the page the user is on NOW
//                 (not to the route we were given)
//    - <  400  -> healthy, nothing to do
//    - request failed (DNS, TLS, timeout, ...) -> log it, nothing to do
//
// Whatever happens in step 4, the pair is now closed for the session and
// will not be probed again.
// =============================================================================

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use super::report::{BrokenLinkReport, DeliveryOutcome, Reporter};
use crate::config::ReporterConfig;
use crate::session::{ActivePage, ProbeLedger, ProbeState, ReportCache, Session};
use crate::transport::Transport;

/// What a single probe() call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    /// Already reported or already probed
    Duplicate,
    /// Route scheme differs from the active page's scheme
    SchemeMismatch,
    Healthy { status: u16 },
    /// The HEAD request never produced a status
    Unreachable { error: String },
    /// Failure-class status; `route` is where the report was attributed
    Broken {
        status: u16,
        route: String,
        delivery: DeliveryOutcome,
    },
}

impl ProbeOutcome {
    pub fn is_broken(&self) -> bool {
        matches!(self, ProbeOutcome::Broken { .. })
    }
}

#[derive(Clone)]
pub struct Prober {
    reporter: Reporter,
    cache: ReportCache,
    ledger: ProbeLedger,
    page: ActivePage,
    transport: Arc<dyn Transport>,
    match_scheme: bool,
}

impl Prober {
    pub fn new(
        config: &ReporterConfig,
        session: &Session,
        reporter: Reporter,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            reporter,
            cache: session.reports.clone(),
            ledger: session.probes.clone(),
            page: session.page.clone(),
            transport,
            match_scheme: config.match_scheme,
        }
    }

    pub async fn probe(&self, link: &BrokenLinkReport) -> ProbeOutcome {
        let BrokenLinkReport { route, href } = link;

        if self.cache.already_reported(route, href) {
            return ProbeOutcome::Duplicate;
        }

        if self.match_scheme && !self.scheme_matches(route) {
            debug!(%route, %href, page_scheme = %self.page.scheme(), "skipping probe across schemes");
            return ProbeOutcome::SchemeMismatch;
        }

        if !self.ledger.begin(route, href) {
            debug!(%route, %href, state = ?self.ledger.state(route, href), "link already probed");
            return ProbeOutcome::Duplicate;
        }

        match self.transport.head(href).await {
            Ok(status) if status >= 400 => {
                let report = BrokenLinkReport::new(self.page.pathname(), href.clone());
                self.ledger.finish(route, href, ProbeState::Reported);
                // The webhook POST never holds up the caller
                let delivery = self.reporter.dispatch(&report);

                ProbeOutcome::Broken {
                    status,
                    route: report.route,
                    delivery,
                }
            }
            Ok(status) => {
                debug!(%href, status, "external link is healthy");
                self.ledger.finish(route, href, ProbeState::Healthy);
                ProbeOutcome::Healthy { status }
            }
            Err(e) => {
                warn!(%route, %href, error = %e, "failed to check external link headers");
                self.ledger.finish(route, href, ProbeState::Unreachable);
                ProbeOutcome::Unreachable { error: e.to_string() }
            }
        }
    }

    // Relative routes ("/docs") carry no scheme and always pass
    fn scheme_matches(&self, route: &str) -> bool {
        match Url::parse(route) {
            Ok(url) => url.scheme() == self.page.scheme(),
            Err(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::test_support::{monitor_with, WEBHOOK};
    use crate::transport::fake::{FakeTransport, Recorded};
    use crate::transport::TransportError;
    use serde_json::json;
    use std::time::Duration;

    #[tokio::test]
    async fn test_broken_link_is_attributed_to_current_page() {
        let transport = FakeTransport::new().head_status("https://x/broken", 404);
        let (monitor, transport) = monitor_with(transport, Some(WEBHOOK), "https://site.com/current-page");

        let outcome = monitor
            .prober()
            .probe(&BrokenLinkReport::new("/a", "https://x/broken"))
            .await;

        assert_eq!(
            outcome,
            ProbeOutcome::Broken {
                status: 404,
                route: "/current-page".to_string(),
                delivery: DeliveryOutcome::Dispatched,
            }
        );
        monitor.drain(Duration::from_secs(1)).await;
        assert_eq!(transport.posts(), vec![json!({"route": "/current-page", "links": ["https://x/broken"]})]);
    }

    #[tokio::test]
    async fn test_server_error_reported_once_per_session() {
        let transport = FakeTransport::new().head_status("https://x.test/dead", 500);
        let (monitor, transport) = monitor_with(transport, Some(WEBHOOK), "https://site.com/current-page");
        let link = BrokenLinkReport::new("https://site.com/a", "https://x.test/dead");

        monitor.prober().probe(&link).await;
        monitor.drain(Duration::from_secs(1)).await;
        assert_eq!(
            transport.requests(),
            vec![
                Recorded::Head("https://x.test/dead".to_string()),
                Recorded::Post {
                    url: WEBHOOK.to_string(),
                    body: json!({"route": "/current-page", "links": ["https://x.test/dead"]}),
                },
            ]
        );

        let second = monitor.prober().probe(&link).await;
        assert_eq!(second, ProbeOutcome::Duplicate);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_healthy_link_is_not_probed_again() {
        let transport = FakeTransport::new().head_status("https://x.test/ok", 204);
        let (monitor, transport) = monitor_with(transport, Some(WEBHOOK), "https://site.com/");
        let link = BrokenLinkReport::new("/a", "https://x.test/ok");

        assert_eq!(monitor.prober().probe(&link).await, ProbeOutcome::Healthy { status: 204 });
        assert_eq!(monitor.prober().probe(&link).await, ProbeOutcome::Duplicate);

        assert_eq!(transport.heads().len(), 1);
        assert!(transport.posts().is_empty());
        assert_eq!(
            monitor.session().probes.state("/a", "https://x.test/ok"),
            Some(ProbeState::Healthy)
        );
    }

    #[tokio::test]
    async fn test_redirect_status_is_not_broken() {
        let transport = FakeTransport::new().head_status("https://x.test/moved", 399);
        let (monitor, transport) = monitor_with(transport, Some(WEBHOOK), "https://site.com/");

        let outcome = monitor
            .prober()
            .probe(&BrokenLinkReport::new("/a", "https://x.test/moved"))
            .await;

        assert!(!outcome.is_broken());
        assert!(transport.posts().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_link_is_logged_not_reported() {
        let transport = FakeTransport::new().head_error("https://nowhere.test/", TransportError::Dns);
        let (monitor, transport) = monitor_with(transport, Some(WEBHOOK), "https://site.com/");
        let link = BrokenLinkReport::new("/a", "https://nowhere.test/");

        let outcome = monitor.prober().probe(&link).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Unreachable {
                error: "could not resolve hostname".to_string()
            }
        );
        assert!(transport.posts().is_empty());

        // Failed checks are final too
        assert_eq!(monitor.prober().probe(&link).await, ProbeOutcome::Duplicate);
        assert_eq!(transport.heads().len(), 1);
    }

    #[tokio::test]
    async fn test_scheme_mismatch_skips_without_recording() {
        let transport = FakeTransport::new().head_status("https://x.test/dead", 404);
        let (monitor, transport) = monitor_with(transport, Some(WEBHOOK), "https://site.com/");
        let link = BrokenLinkReport::new("http://site.com/a", "https://x.test/dead");

        assert_eq!(monitor.prober().probe(&link).await, ProbeOutcome::SchemeMismatch);
        assert!(transport.requests().is_empty());
        assert_eq!(monitor.session().probes.state("http://site.com/a", "https://x.test/dead"), None);

        // After navigating to an http page the same pair is probed
        monitor.session().page.navigate(Url::parse("http://site.com/a").unwrap());
        assert!(monitor.prober().probe(&link).await.is_broken());
    }

    #[tokio::test]
    async fn test_scheme_check_can_be_disabled() {
        let transport = Arc::new(FakeTransport::new().head_status("https://x.test/dead", 404));
        let config = ReporterConfig::new(Some(WEBHOOK.to_string())).with_scheme_check(false);
        let session = Session::new(Url::parse("https://site.com/").unwrap());
        let reporter = Reporter::new(&config, session.reports.clone(), transport.clone());
        let prober = Prober::new(&config, &session, reporter, transport.clone());

        let outcome = prober
            .probe(&BrokenLinkReport::new("http://site.com/a", "https://x.test/dead"))
            .await;
        assert!(outcome.is_broken());
    }

    #[tokio::test]
    async fn test_probe_without_webhook_still_checks() {
        let transport = FakeTransport::new().head_status("https://x.test/dead", 410);
        let (monitor, transport) = monitor_with(transport, None, "https://site.com/page");

        let outcome = monitor
            .prober()
            .probe(&BrokenLinkReport::new("/page", "https://x.test/dead"))
            .await;

        assert_eq!(
            outcome,
            ProbeOutcome::Broken {
                status: 410,
                route: "/page".to_string(),
                delivery: DeliveryOutcome::Disabled,
            }
        );
        assert_eq!(transport.heads().len(), 1);
        assert!(transport.posts().is_empty());
    }

    #[tokio::test]
    async fn test_already_reported_pair_is_not_probed() {
        let (monitor, transport) = monitor_with(FakeTransport::new(), Some(WEBHOOK), "https://site.com/");
        let link = BrokenLinkReport::new("/a", "https://x.test/dead");

        monitor.reporter().report(&link).await;
        assert_eq!(monitor.prober().probe(&link).await, ProbeOutcome::Duplicate);
        assert!(transport.heads().is_empty());
    }

    #[tokio::test]
    async fn test_hung_webhook_does_not_block_check() {
        let transport = FakeTransport::new()
            .head_status("https://x.test/dead", 404)
            .hanging_posts();
        let (monitor, transport) = monitor_with(transport, Some(WEBHOOK), "https://site.com/docs");
        let link = BrokenLinkReport::new("/docs", "https://x.test/dead");

        let outcome = tokio::time::timeout(Duration::from_secs(1), monitor.prober().probe(&link))
            .await
            .expect("check should not wait for the webhook");

        assert!(outcome.is_broken());
        assert_eq!(
            monitor.session().probes.state("/docs", "https://x.test/dead"),
            Some(ProbeState::Reported)
        );
        assert_eq!(monitor.drain(Duration::from_millis(50)).await, 0);
        assert_eq!(transport.posts().len(), 1);
    }
}
