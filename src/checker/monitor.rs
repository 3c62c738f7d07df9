// src/checker/monitor.rs
// =============================================================================
// LinkMonitor: the two calls page/navigation code makes.
//
// - report_broken_link(link)          -> Reporter
// - check_external_link_headers(link) -> Prober (which may call the Reporter)
//
// Both are async and return nothing: whatever goes wrong inside is logged
// and swallowed, so callers can fire them and forget about them. Neither
// waits for the webhook; the POST runs in the background until drain().
// Code that wants to know what happened (tests, the CLI) goes through
// reporter() and prober() instead.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use super::probe::Prober;
use super::report::{BrokenLinkReport, Reporter};
use crate::config::ReporterConfig;
use crate::session::Session;
use crate::transport::Transport;

#[derive(Clone)]
pub struct LinkMonitor {
    session: Session,
    reporter: Reporter,
    prober: Prober,
}

impl LinkMonitor {
    pub fn new(config: &ReporterConfig, session: Session, transport: Arc<dyn Transport>) -> Self {
        let reporter = Reporter::new(config, session.reports.clone(), transport.clone());
        let prober = Prober::new(config, &session, reporter.clone(), transport);

        Self {
            session,
            reporter,
            prober,
        }
    }

    pub async fn report_broken_link(&self, link: BrokenLinkReport) {
        self.reporter.dispatch(&link);
    }

    pub async fn check_external_link_headers(&self, link: BrokenLinkReport) {
        self.prober.probe(&link).await;
    }

    /// Waits up to `cap` for reports still on their way to the webhook.
    pub async fn drain(&self, cap: Duration) -> usize {
        self.reporter.drain(cap).await
    }

    pub fn reporter(&self) -> &Reporter {
        &self.reporter
    }

    pub fn prober(&self) -> &Prober {
        &self.prober
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}
