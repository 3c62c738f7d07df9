// src/session/page.rs
// =============================================================================
// The page the user is currently on.
//
// The prober attributes broken external links to wherever the user is *now*
// (its path), and uses its scheme to avoid probing across http/https.
// Navigation swaps the whole Url in one step, so readers never see a
// half-updated location.
// =============================================================================

use arc_swap::ArcSwap;
use std::sync::Arc;
use url::Url;

#[derive(Debug, Clone)]
pub struct ActivePage {
    location: Arc<ArcSwap<Url>>,
}

impl ActivePage {
    pub fn new(location: Url) -> Self {
        Self {
            location: Arc::new(ArcSwap::from_pointee(location)),
        }
    }

    pub fn navigate(&self, location: Url) {
        self.location.store(Arc::new(location));
    }

    /// Path of the current page, e.g. "/docs/intro".
    pub fn pathname(&self) -> String {
        self.location.load().path().to_string()
    }

    pub fn scheme(&self) -> String {
        self.location.load().scheme().to_string()
    }
}
