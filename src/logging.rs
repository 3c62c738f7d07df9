// src/logging.rs
// =============================================================================
// Diagnostics go through `tracing` and are written to stderr, so the
// results printed on stdout (tables or --json) stay clean.
//
// The level comes from RUST_LOG, e.g.
//   RUST_LOG=broken_link_reporter=debug broken-link-reporter scan ...
// =============================================================================

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "broken_link_reporter=info";

pub fn init() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
