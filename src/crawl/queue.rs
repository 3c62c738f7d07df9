// src/crawl/queue.rs
// =============================================================================
// Breadth-first navigation of a website that feeds the link monitor.
//
// How it works:
// 1. Start with the initial URL in a queue
// 2. "Navigate" to the page: it becomes the session's active page
// 3. Fetch the page HTML
//    - missing page (>= 400) reached from another page -> report it against
//      the page that linked to it
//    - redirected? the page is where the redirect ended up: links resolve
//      against that URL, and a redirect off the site stops there
// 4. Extract all links from the page
//    - other-host links are probed (HEAD) concurrently
//    - same-host links are queued for the next depth level, or probed
//      like external ones once the depth limit is reached
// 5. Repeat until queue is empty
// 6. Give reports still on their way to the webhook a bounded time to land
//
// Every fetch and every link check is capped at request_timeout, so one
// server that never answers cannot stall the scan.
//
// Politeness:
// - Adds a delay between pages to avoid overwhelming servers
// - Only navigates the starting host
//
// Rust concepts:
// - HashSet: To track visited URLs (O(1) lookup)
// - VecDeque: Double-ended queue for breadth-first crawling
// - buffer_unordered: run up to N probes at once
// =============================================================================

use anyhow::{anyhow, Result};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::checker::{extract_page_links, BrokenLinkReport, LinkMonitor};
use crate::config::DEFAULT_WAIT_LIMIT;
use crate::session::ProbeState;
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// 1 = just the starting page
    pub max_depth: usize,
    /// Pause after each page
    pub delay: Duration,
    /// Checks in flight at once for one page
    pub concurrency: usize,
    /// Longest wait for one page fetch, one link check, or the final
    /// webhook drain
    pub request_timeout: Duration,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: 1,
            delay: Duration::from_millis(100),
            concurrency: 50,
            request_timeout: DEFAULT_WAIT_LIMIT,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub pages_visited: usize,
    /// Same-host pages that answered >= 400 when followed from another page
    pub missing_pages: usize,
    pub links_probed: usize,
}

// Represents a page in the crawl queue
#[derive(Debug, Clone)]
struct CrawlItem {
    url: Url,
    depth: usize,
    // The page that linked here; None for the starting page
    referrer: Option<Url>,
}

pub async fn crawl_website(
    start_url: &str,
    options: &CrawlOptions,
    monitor: &LinkMonitor,
    transport: &dyn Transport,
) -> Result<CrawlSummary> {
    let start = Url::parse(start_url).map_err(|e| anyhow!("Invalid URL '{}': {}", start_url, e))?;
    let host = start
        .host_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("URL has no host: {}", start_url))?;

    let mut queue = VecDeque::new();
    queue.push_back(CrawlItem {
        url: start,
        depth: 1,
        referrer: None,
    });

    let mut visited = HashSet::new();
    let mut summary = CrawlSummary::default();

    while let Some(item) = queue.pop_front() {
        if !visited.insert(item.url.clone()) {
            continue;
        }

        info!(depth = item.depth, url = %item.url, "navigating");
        monitor.session().page.navigate(item.url.clone());

        let page = match tokio::time::timeout(options.request_timeout, transport.get(item.url.as_str())).await {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => {
                warn!(url = %item.url, error = %e, "failed to fetch page");
                continue;
            }
            Err(_) => {
                warn!(url = %item.url, "timed out fetching page");
                continue;
            }
        };

        if page.status >= 400 {
            match &item.referrer {
                Some(referrer) => {
                    summary.missing_pages += 1;
                    monitor
                        .report_broken_link(BrokenLinkReport::new(referrer.path(), item.url.as_str()))
                        .await;
                }
                None => warn!(url = %item.url, status = page.status, "starting page is not reachable"),
            }
            continue;
        }

        // From here on the page is wherever the redirects ended
        let here = page.final_url;
        if here != item.url {
            if !visited.insert(here.clone()) {
                continue;
            }
            if here.host_str() != Some(host.as_str()) {
                info!(from = %item.url, to = %here, "redirected off site, not following");
                continue;
            }
            monitor.session().page.navigate(here.clone());
        }

        summary.pages_visited += 1;
        let links = extract_page_links(&page.body, &here);

        let mut to_check = links.external;
        for link in links.internal {
            if item.depth < options.max_depth {
                if !visited.contains(&link) {
                    queue.push_back(CrawlItem {
                        url: link,
                        depth: item.depth + 1,
                        referrer: Some(here.clone()),
                    });
                }
            } else {
                to_check.push(link);
            }
        }

        summary.links_probed += to_check.len();
        let route = here.as_str();
        stream::iter(to_check)
            .map(|href| check_link(monitor, route, href, options.request_timeout))
            .buffer_unordered(options.concurrency.max(1))
            .collect::<Vec<()>>()
            .await;

        if !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    monitor.drain(options.request_timeout).await;
    Ok(summary)
}

// One link check, abandoned after `limit`. An abandoned check is closed as
// Unreachable so it is not retried this session.
async fn check_link(monitor: &LinkMonitor, route: &str, href: Url, limit: Duration) {
    let link = BrokenLinkReport::new(route, href.as_str());
    if tokio::time::timeout(limit, monitor.check_external_link_headers(link))
        .await
        .is_err()
    {
        warn!(%route, %href, "timed out checking link");
        monitor
            .session()
            .probes
            .finish(route, href.as_str(), ProbeState::Unreachable);
    }
}
