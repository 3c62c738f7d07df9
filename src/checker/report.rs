// src/checker/report.rs
// =============================================================================
// The Reporter: tells the webhook about a broken link, once per session.
//
// Steps for report(route, href):
// 1. No webhook configured?          -> do nothing (Disabled)
// 2. Already reported for the route? -> do nothing (Duplicate)
// 3. Record the href in the cache FIRST, then POST
//      {"route": route, "links": [every href recorded for route]}
//    to the webhook without reading the response.
// 4. If the POST fails we log it and move on. The cache entry stays, so the
//    same link is never sent again this session, even after a failure.
//
// Steps 1-3 up to the POST run synchronously in claim(). The POST itself is
// either awaited (report) or handed to a background task (dispatch).
//
// Rust concepts:
// - Arc<dyn Transport>: shared ownership of a trait object
// - let-else: early return when an Option is None
// - Enums as results: DeliveryOutcome says what happened without ever
//   being an error the caller has to handle
// =============================================================================

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

use super::deliveries::Deliveries;
use crate::config::ReporterConfig;
use crate::session::ReportCache;
use crate::transport::Transport;

/// A link on a route that may be broken.
#[derive(Debug, Clone)]
pub struct BrokenLinkReport {
    /// The page the link is attributed to
    pub route: String,
    /// The link target
    pub href: String,
}

impl BrokenLinkReport {
    pub fn new(route: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            route: route.into(),
            href: href.into(),
        }
    }
}

// Wire format of one webhook delivery
#[derive(Debug, Serialize)]
struct ReportPayload<'a> {
    route: &'a str,
    links: &'a [String],
}

/// What a single report() or dispatch() call ended up doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryOutcome {
    /// No webhook configured
    Disabled,
    /// Already reported for this route this session
    Duplicate,
    /// Recorded, and the POST handed to a background task
    Dispatched,
    /// The POST was sent; the status is informational only
    Delivered { status: u16 },
    /// The POST could not be sent
    Failed { error: String },
}

// Result of the synchronous half of a report
enum Claim {
    Skip(DeliveryOutcome),
    Send(PendingDelivery),
}

// Everything one POST needs, owned so it can run as its own task
struct PendingDelivery {
    webhook: String,
    body: serde_json::Value,
    route: String,
    href: String,
    transport: Arc<dyn Transport>,
}

impl PendingDelivery {
    async fn send(self) -> DeliveryOutcome {
        match self.transport.post_json(&self.webhook, &self.body).await {
            Ok(status) => {
                debug!(route = %self.route, href = %self.href, status, "reported broken link");
                DeliveryOutcome::Delivered { status }
            }
            Err(e) => {
                error!(route = %self.route, href = %self.href, error = %e, "failed to report broken link");
                DeliveryOutcome::Failed { error: e.to_string() }
            }
        }
    }
}

#[derive(Clone)]
pub struct Reporter {
    webhook: Option<String>,
    cache: ReportCache,
    transport: Arc<dyn Transport>,
    deliveries: Deliveries,
}

impl Reporter {
    pub fn new(config: &ReporterConfig, cache: ReportCache, transport: Arc<dyn Transport>) -> Self {
        Self {
            webhook: config.webhook.clone(),
            cache,
            transport,
            deliveries: Deliveries::default(),
        }
    }

    /// Reports `link` and waits for the POST to finish.
    pub async fn report(&self, link: &BrokenLinkReport) -> DeliveryOutcome {
        match self.claim(link) {
            Claim::Skip(outcome) => outcome,
            Claim::Send(pending) => pending.send().await,
        }
    }

    /// Reports `link` without waiting: the POST runs as a background task.
    ///
    /// The cache is updated before this returns.
    pub fn dispatch(&self, link: &BrokenLinkReport) -> DeliveryOutcome {
        match self.claim(link) {
            Claim::Skip(outcome) => outcome,
            Claim::Send(pending) => {
                self.deliveries.spawn(pending.send());
                DeliveryOutcome::Dispatched
            }
        }
    }

    /// Gives dispatched POSTs up to `cap` to finish; returns how many did.
    pub async fn drain(&self, cap: Duration) -> usize {
        self.deliveries.drain(cap).await
    }

    fn claim(&self, link: &BrokenLinkReport) -> Claim {
        let Some(webhook) = self.webhook.as_deref() else {
            return Claim::Skip(DeliveryOutcome::Disabled);
        };

        if self.cache.already_reported(&link.route, &link.href) {
            debug!(route = %link.route, href = %link.href, "broken link already reported");
            return Claim::Skip(DeliveryOutcome::Duplicate);
        }

        // Recorded before any await, so a second call for the same pair
        // sees it and bails out.
        let links = self.cache.record(&link.route, &link.href);

        let payload = ReportPayload {
            route: &link.route,
            links: &links,
        };
        match serde_json::to_value(&payload) {
            Ok(body) => Claim::Send(PendingDelivery {
                webhook: webhook.to_string(),
                body,
                route: link.route.clone(),
                href: link.href.clone(),
                transport: self.transport.clone(),
            }),
            Err(e) => {
                error!(route = %link.route, error = %e, "failed to encode broken link report");
                Claim::Skip(DeliveryOutcome::Failed { error: e.to_string() })
            }
        }
    }
}
