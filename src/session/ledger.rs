// src/session/ledger.rs
// =============================================================================
// Per-link state for the prober.
//
// Every (route, href) pair starts out Unchecked (simply: not in the map).
// The first probe moves it to Checking before any network call is made,
// and the result of the HEAD request moves it to one of the final states.
// Once a pair is in the map it stays there for the rest of the session, so
// a link is probed at most once.
//
//   Unchecked -> Checking -> Reported | Healthy | Unreachable
// =============================================================================

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeState {
    /// A HEAD request is in flight
    Checking,
    /// The link answered >= 400 and was handed to the reporter
    Reported,
    /// The link answered < 400
    Healthy,
    /// The HEAD request itself failed (DNS, TLS, timeout, ...)
    Unreachable,
}

#[derive(Debug, Clone, Default)]
pub struct ProbeLedger {
    inner: Arc<DashMap<(String, String), ProbeState>>,
}

impl ProbeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves an unchecked pair to `Checking`.
    ///
    /// Returns false if the pair was already in any state.
    pub fn begin(&self, route: &str, href: &str) -> bool {
        match self.inner.entry((route.to_string(), href.to_string())) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(ProbeState::Checking);
                true
            }
        }
    }

    pub fn finish(&self, route: &str, href: &str, state: ProbeState) {
        self.inner
            .insert((route.to_string(), href.to_string()), state);
    }

    pub fn state(&self, route: &str, href: &str) -> Option<ProbeState> {
        self.inner
            .get(&(route.to_string(), href.to_string()))
            .map(|entry| *entry.value())
    }

    pub fn count(&self, state: ProbeState) -> usize {
        self.inner.iter().filter(|entry| *entry.value() == state).count()
    }
}
