// src/transport/http.rs
// =============================================================================
// The real Transport, built on reqwest.
//
// Key functionality:
// - One shared Client for every request (connection pooling)
// - Follows up to 5 redirects, like a browser would
// - Optional per-request timeout (off unless configured)
// - Sorts reqwest failures into TransportError variants
//
// The webhook POST deliberately ignores the response: we look at the status
// for logging only and never download the body.
// =============================================================================

use async_trait::async_trait;
use reqwest::{redirect, Client};

use super::{PageResponse, Transport, TransportError};
use crate::config::ReporterConfig;

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &ReporterConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder()
            .user_agent(concat!("broken-link-reporter/", env!("CARGO_PKG_VERSION")))
            .redirect(redirect::Policy::limited(5));

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn head(&self, url: &str) -> Result<u16, TransportError> {
        let response = self.client.head(url).send().await?;
        Ok(response.status().as_u16())
    }

    async fn get(&self, url: &str) -> Result<PageResponse, TransportError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        // Taken before text() consumes the response
        let final_url = response.url().clone();

        let body = if status.is_success() {
            response.text().await?
        } else {
            String::new()
        };

        Ok(PageResponse {
            status: status.as_u16(),
            final_url,
            body,
        })
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<u16, TransportError> {
        // .json() sets Content-Type: application/json for us
        let response = self.client.post(url).json(body).send().await?;
        Ok(response.status().as_u16())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return TransportError::Timeout;
        }
        if error.is_redirect() {
            return TransportError::TooManyRedirects;
        }

        // The useful detail (dns, certificate, ...) usually sits further
        // down the source chain than reqwest's own message.
        let detail = error_chain(&error);
        let lowered = detail.to_lowercase();

        if error.is_connect() {
            if lowered.contains("dns") || lowered.contains("resolve") {
                TransportError::Dns
            } else if lowered.contains("certificate") || lowered.contains("tls") {
                TransportError::Tls
            } else {
                TransportError::Connect(detail)
            }
        } else if lowered.contains("certificate") || lowered.contains("ssl") {
            TransportError::Tls
        } else {
            TransportError::Request(detail)
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut parts = vec![error.to_string()];
    let mut source = error.source();
    while let Some(inner) = source {
        parts.push(inner.to_string());
        source = inner.source();
    }
    parts.join(": ")
}
