//! Background data loading
//!
//! Requests run as blocking calls on short-lived worker threads; each
//! completion comes back to the event loop over an mpsc channel, tagged
//! with the generation that was current when the request was dispatched.
//! Re-issuing a resource bumps its generation, so a completion carrying
//! an older generation is stale and gets dropped where messages are
//! applied. Completions for resources that were not re-issued apply no
//! matter which view is active.

use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::api::{ApiClient, ApiError, HealthStatus, Holding, NewHoldingRequest, NewsItem, SymbolMatch};

/// Debounce interval for the symbol search.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// A fetch completion delivered to the event loop.
#[derive(Debug)]
pub enum FetchMessage {
    Holdings {
        generation: u64,
        result: Result<Vec<Holding>, ApiError>,
    },
    News {
        generation: u64,
        result: Result<Vec<NewsItem>, ApiError>,
    },
    Search {
        generation: u64,
        query: String,
        result: Result<Vec<SymbolMatch>, ApiError>,
    },
    Health {
        generation: u64,
        result: Result<HealthStatus, ApiError>,
    },
    PrivateProbe {
        generation: u64,
        result: Result<(), ApiError>,
    },
    HoldingCreated {
        result: Result<(), ApiError>,
    },
}

/// Dispatches backend requests onto worker threads.
pub struct Fetcher {
    client: Arc<ApiClient>,
    tx: Sender<FetchMessage>,
}

impl Fetcher {
    pub fn new(client: Arc<ApiClient>, tx: Sender<FetchMessage>) -> Self {
        Self { client, tx }
    }

    pub fn spawn_holdings(&self, generation: u64) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            debug!(generation, "fetching holdings");
            let result = client.holdings();
            if let Err(err) = &result {
                error!(%err, "holdings fetch failed");
            }
            let _ = tx.send(FetchMessage::Holdings { generation, result });
        });
    }

    pub fn spawn_news(&self, generation: u64) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            debug!(generation, "fetching news");
            let result = client.news();
            if let Err(err) = &result {
                error!(%err, "news fetch failed");
            }
            let _ = tx.send(FetchMessage::News { generation, result });
        });
    }

    pub fn spawn_search(&self, generation: u64, query: String) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            debug!(generation, %query, "searching symbols");
            let result = client.search(&query);
            if let Err(err) = &result {
                error!(%err, "symbol search failed");
            }
            let _ = tx.send(FetchMessage::Search {
                generation,
                query,
                result,
            });
        });
    }

    pub fn spawn_health(&self, generation: u64) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            debug!(generation, "probing health");
            let result = client.health();
            let _ = tx.send(FetchMessage::Health { generation, result });
        });
    }

    pub fn spawn_private_probe(&self, generation: u64) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            debug!(generation, "probing private endpoint");
            let result = client.private_probe();
            let _ = tx.send(FetchMessage::PrivateProbe { generation, result });
        });
    }

    pub fn spawn_create_holding(&self, request: NewHoldingRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        thread::spawn(move || {
            debug!(symbol = %request.symbol, "creating holding");
            let result = client.create_holding(&request);
            if let Err(err) = &result {
                error!(%err, "create holding failed");
            }
            let _ = tx.send(FetchMessage::HoldingCreated { result });
        });
    }
}

/// Coalesces search keystrokes: each input resets the timer, and the
/// query is released only once the delay has elapsed with no further
/// input.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<String>,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
        }
    }

    /// Record a keystroke at `now`, resetting the timer.
    pub fn input(&mut self, query: String, now: Instant) {
        self.pending = Some(query);
        self.deadline = Some(now + self.delay);
    }

    /// Drop any pending query without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    /// Take the query if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Time remaining until the pending deadline, for event-loop poll
    /// timeouts. `None` when nothing is pending.
    pub fn time_until_ready(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
