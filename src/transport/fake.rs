// src/transport/fake.rs
// In-memory Transport for tests: scripted answers, every request recorded.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use url::Url;

use super::{PageResponse, Transport, TransportError};

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Head(String),
    Get(String),
    Post { url: String, body: serde_json::Value },
}

#[derive(Default)]
pub struct FakeTransport {
    heads: HashMap<String, Result<u16, TransportError>>,
    pages: HashMap<String, PageResponse>,
    redirects: HashMap<String, String>,
    hung_heads: HashSet<String>,
    fail_posts: bool,
    hang_posts: bool,
    requests: Mutex<Vec<Recorded>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn head_status(mut self, url: &str, status: u16) -> Self {
        self.heads.insert(url.to_string(), Ok(status));
        self
    }

    pub fn head_error(mut self, url: &str, error: TransportError) -> Self {
        self.heads.insert(url.to_string(), Err(error));
        self
    }

    pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.pages.insert(
            url.to_string(),
            PageResponse {
                status,
                final_url: Url::parse(url).unwrap(),
                body: body.to_string(),
            },
        );
        self
    }

    /// GET `from` answers with whatever `to` serves, as if redirected there.
    pub fn redirect(mut self, from: &str, to: &str) -> Self {
        self.redirects.insert(from.to_string(), to.to_string());
        self
    }

    /// HEAD `url` never answers.
    pub fn hang_head(mut self, url: &str) -> Self {
        self.hung_heads.insert(url.to_string());
        self
    }

    pub fn failing_posts(mut self) -> Self {
        self.fail_posts = true;
        self
    }

    /// Webhook POSTs are recorded but never answer.
    pub fn hanging_posts(mut self) -> Self {
        self.hang_posts = true;
        self
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<serde_json::Value> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::Post { body, .. } => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn heads(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .filter_map(|r| match r {
                Recorded::Head(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    fn record(&self, request: Recorded) {
        self.requests.lock().unwrap().push(request);
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn head(&self, url: &str) -> Result<u16, TransportError> {
        self.record(Recorded::Head(url.to_string()));
        if self.hung_heads.contains(url) {
            return futures::future::pending().await;
        }
        // Unscripted links are healthy
        self.heads.get(url).cloned().unwrap_or(Ok(200))
    }

    async fn get(&self, url: &str) -> Result<PageResponse, TransportError> {
        self.record(Recorded::Get(url.to_string()));
        let target = self.redirects.get(url).map(String::as_str).unwrap_or(url);
        match self.pages.get(target) {
            Some(page) => Ok(page.clone()),
            None => Ok(PageResponse {
                status: 404,
                final_url: Url::parse(target).map_err(|e| TransportError::Request(e.to_string()))?,
                body: String::new(),
            }),
        }
    }

    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Result<u16, TransportError> {
        self.record(Recorded::Post {
            url: url.to_string(),
            body: body.clone(),
        });
        if self.hang_posts {
            return futures::future::pending().await;
        }
        if self.fail_posts {
            Err(TransportError::Connect("connection refused".to_string()))
        } else {
            Ok(200)
        }
    }
}
