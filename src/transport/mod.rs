// src/transport/mod.rs
// =============================================================================
// Outbound HTTP, behind a trait.
//
// The reporter, prober and crawler only ever need three requests:
// - HEAD an href to see its status code (the existence probe)
// - GET a page to read its HTML (navigation)
// - POST a JSON body to the webhook (report delivery)
//
// Putting them behind the Transport trait lets the real code use reqwest
// while tests plug in an in-memory fake that records every request.
//
// Rust concepts:
// - Traits: shared behaviour with several implementations
// - async-trait: async methods on a trait object (Arc<dyn Transport>)
// - thiserror: a typed error enum with Display generated for us
// =============================================================================

mod http;

#[cfg(test)]
pub mod fake;

pub use http::HttpTransport;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// Why a request never produced a status code.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("could not resolve hostname")]
    Dns,
    #[error("TLS certificate error")]
    Tls,
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("request failed: {0}")]
    Request(String),
}

/// A fetched page. `body` is empty unless the status was a success.
#[derive(Debug, Clone)]
pub struct PageResponse {
    pub status: u16,
    /// Where the request ended up after following redirects
    pub final_url: Url,
    pub body: String,
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Header-only request; only the status code comes back.
    async fn head(&self, url: &str) -> Result<u16, TransportError>;

    async fn get(&self, url: &str) -> Result<PageResponse, TransportError>;

    /// POSTs `body` as `application/json`. The response body is never read.
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<u16, TransportError>;
}
