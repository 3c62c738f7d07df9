// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Global flags (usable before or after the subcommand):
//   --webhook URL      where reports go (or BROKEN_LINK_WEBHOOK)
//   --json             machine-readable output
//   --timeout-secs N   give up on a request after N seconds
//   --no-scheme-check  probe even when route and page schemes differ
// =============================================================================

use clap::{Parser, Subcommand};

use crate::config::ReporterConfig;

#[derive(Parser, Debug)]
#[command(
    name = "broken-link-reporter",
    version,
    about = "Find broken links while navigating a site and report them to a webhook",
    long_about = "broken-link-reporter checks the links a visitor meets on each page, \
                  and POSTs every broken one to a webhook at most once per run. \
                  Without a webhook it still checks links but reports nothing."
)]
pub struct Cli {
    /// Webhook that receives broken-link reports (reporting is off when unset or blank)
    #[arg(long, global = true, env = "BROKEN_LINK_WEBHOOK")]
    pub webhook: Option<String>,

    /// Output results in JSON format instead of a table
    #[arg(long, global = true)]
    pub json: bool,

    /// Per-request timeout in seconds (default: none, except scan caps each
    /// request at 10 seconds)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Probe links even when the route's scheme differs from the current page's
    #[arg(long, global = true)]
    pub no_scheme_check: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Report a link as broken for a route
    ///
    /// Example: broken-link-reporter report --route /docs --href https://x.test/dead
    Report {
        /// Page the link is attributed to
        #[arg(long)]
        route: String,

        /// The broken link
        #[arg(long)]
        href: String,
    },

    /// HEAD-check one external link and report it if it answers >= 400
    ///
    /// Example: broken-link-reporter probe --route /docs --href https://x.test --page https://site.com/docs
    Probe {
        /// Route the link was found on
        #[arg(long)]
        route: String,

        /// The link to check
        #[arg(long)]
        href: String,

        /// URL of the page the user is on; broken links are reported against its path
        #[arg(long)]
        page: String,
    },

    /// Navigate a website and check every link on the pages visited
    ///
    /// Example: broken-link-reporter scan https://example.com --max-depth 2
    Scan {
        /// Website URL to start from (e.g., https://example.com)
        website_url: String,

        /// Maximum navigation depth (default: 1)
        ///
        /// Depth 1 = just the starting page; same-site links on the last
        /// level are HEAD-checked instead of visited
        #[arg(long, default_value_t = 1)]
        max_depth: usize,
    },
}

impl Cli {
    pub fn config(&self) -> ReporterConfig {
        ReporterConfig::new(self.webhook.clone())
            .with_timeout_secs(self.timeout_secs)
            .with_scheme_check(!self.no_scheme_check)
    }
}
