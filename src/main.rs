// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (stderr) and parse command-line arguments
// 2. Build one HTTP transport and one session for the whole run
// 3. Dispatch to the appropriate subcommand handler
// 4. Print what happened
// 5. Exit with proper code (0 = nothing broken, 1 = broken links, 2 = error)
// =============================================================================

mod checker;       // src/checker/ - reporter, prober, link extraction
mod cli;           // src/cli.rs - command-line parsing
mod config;        // src/config.rs - webhook and request settings
mod crawl;         // src/crawl/ - website navigation
mod logging;       // src/logging.rs - tracing setup
mod session;       // src/session/ - per-run state
mod transport;     // src/transport/ - outbound HTTP

use anyhow::{anyhow, Result};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use url::Url;

use checker::{BrokenLinkReport, LinkMonitor, Reporter};
use cli::{Cli, Commands};
use config::ReporterConfig;
use crawl::{CrawlOptions, CrawlSummary};
use session::{ProbeState, ReportCache, Session};
use transport::HttpTransport;

#[tokio::main]
async fn main() {
    logging::init();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = cli.config();

    if !config.reporting_enabled() {
        info!("no webhook configured, broken links will be detected but not reported");
    }

    let transport = Arc::new(HttpTransport::new(&config)?);

    match cli.command {
        Commands::Report { route, href } => {
            handle_report(&config, transport, BrokenLinkReport::new(route, href), cli.json).await
        }
        Commands::Probe { route, href, page } => {
            handle_probe(&config, transport, BrokenLinkReport::new(route, href), &page, cli.json).await
        }
        Commands::Scan { website_url, max_depth } => {
            handle_scan(&config, transport, &website_url, max_depth, cli.json).await
        }
    }
}

async fn handle_report(
    config: &ReporterConfig,
    transport: Arc<HttpTransport>,
    link: BrokenLinkReport,
    json: bool,
) -> Result<i32> {
    let reporter = Reporter::new(config, ReportCache::new(), transport);
    let outcome = reporter.report(&link).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{} on {}: {:?}", link.href, link.route, outcome);
    }
    Ok(0)
}

async fn handle_probe(
    config: &ReporterConfig,
    transport: Arc<HttpTransport>,
    link: BrokenLinkReport,
    page: &str,
    json: bool,
) -> Result<i32> {
    let page = Url::parse(page).map_err(|e| anyhow!("Invalid page URL '{}': {}", page, e))?;
    let monitor = LinkMonitor::new(config, Session::new(page), transport);
    let outcome = monitor.prober().probe(&link).await;
    monitor.drain(config.wait_limit()).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!("{} on {}: {:?}", link.href, link.route, outcome);
    }
    Ok(if outcome.is_broken() { 1 } else { 0 })
}

async fn handle_scan(
    config: &ReporterConfig,
    transport: Arc<HttpTransport>,
    website_url: &str,
    max_depth: usize,
    json: bool,
) -> Result<i32> {
    if !json {
        println!("🔍 Scanning website: {}", website_url);
        println!("📊 Max depth: {}", max_depth);
    }

    let start = Url::parse(website_url).map_err(|e| anyhow!("Invalid URL '{}': {}", website_url, e))?;
    let monitor = LinkMonitor::new(config, Session::new(start), transport.clone());
    let options = CrawlOptions {
        max_depth,
        request_timeout: config.wait_limit(),
        ..CrawlOptions::default()
    };

    let summary = crawl::crawl_website(website_url, &options, &monitor, transport.as_ref()).await?;
    if monitor.session().reports.is_empty() {
        info!("no broken links were reported");
    } else {
        info!(links = monitor.session().reports.len(), "broken links reported");
    }
    let output = ScanOutput::new(&summary, monitor.session());

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_table(&output, config.reporting_enabled());
    }

    Ok(if output.broken > 0 { 1 } else { 0 })
}

#[derive(Debug, Serialize)]
struct ReportedRoute {
    route: String,
    links: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ScanOutput<'a> {
    #[serde(flatten)]
    summary: &'a CrawlSummary,
    /// Missing pages plus probed links that answered >= 400
    broken: usize,
    unreachable: usize,
    reported: Vec<ReportedRoute>,
}

impl<'a> ScanOutput<'a> {
    fn new(summary: &'a CrawlSummary, session: &Session) -> Self {
        let reported = session
            .reports
            .snapshot()
            .into_iter()
            .map(|(route, links)| ReportedRoute { route, links })
            .collect();

        Self {
            summary,
            broken: summary.missing_pages + session.probes.count(ProbeState::Reported),
            unreachable: session.probes.count(ProbeState::Unreachable),
            reported,
        }
    }
}

fn print_table(output: &ScanOutput, reporting_enabled: bool) {
    println!();
    println!("{:<40} {:<60}", "ROUTE", "REPORTED LINK");
    println!("{}", "=".repeat(100));

    for route in &output.reported {
        for link in &route.links {
            println!("{:<40} {:<60}", route.route, link);
        }
    }

    println!();
    println!("📊 Summary:");
    println!("   📄 Pages visited: {}", output.summary.pages_visited);
    println!("   🌐 Links probed: {}", output.summary.links_probed);
    println!("   ❌ Broken: {}", output.broken);
    println!("   ⚠️  Unreachable: {}", output.unreachable);
    if !reporting_enabled {
        println!("   (no webhook configured, nothing was reported)");
    }
}
