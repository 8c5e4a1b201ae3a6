//! API client for the portfolio backend
//!
//! Provides typed methods for fetching holdings, news, symbol search
//! results, and health probes from the backend service. Backend payloads
//! are normalized into canonical types here; field-name drift between
//! backend revisions (`avg_price` vs `avgPrice`, nested `priceData.last`)
//! never leaks past this module.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::Session;

/// HTTP client for the portfolio backend.
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
    session: Arc<dyn Session>,
}

impl ApiClient {
    /// Create a client for the given base URL and session.
    pub fn new(base_url: impl Into<String>, session: Arc<dyn Session>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::blocking::Client::new(),
            session,
        }
    }

    /// Whether requests go out with a bearer token attached.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::blocking::RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self.client.request(method, url);
        if let Some(token) = self.session.current_token() {
            req = req.bearer_auth(token);
        }
        req
    }

    fn send_json<T: serde::de::DeserializeOwned>(
        req: reqwest::blocking::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = req.send().map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), response.text().ok()));
        }
        response.json().map_err(|e| ApiError::Payload(e.to_string()))
    }

    /// Fetch all holdings, normalized.
    pub fn holdings(&self) -> Result<Vec<Holding>, ApiError> {
        let raw: Vec<RawHolding> = Self::send_json(self.request(reqwest::Method::GET, "/api/holdings"))?;
        raw.into_iter().map(RawHolding::into_holding).collect()
    }

    /// Create a new holding. The caller re-fetches holdings on success.
    pub fn create_holding(&self, request: &NewHoldingRequest) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::POST, "/api/holdings")
            .json(request)
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), response.text().ok()));
        }
        Ok(())
    }

    /// Fetch the news feed.
    pub fn news(&self) -> Result<Vec<NewsItem>, ApiError> {
        Self::send_json(self.request(reqwest::Method::GET, "/api/news"))
    }

    /// Search symbols matching a query.
    pub fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, ApiError> {
        Self::send_json(
            self.request(reqwest::Method::GET, "/api/search")
                .query(&[("query", query)]),
        )
    }

    /// Liveness probe. Any 2xx response counts as healthy, with or
    /// without a well-formed body.
    pub fn health(&self) -> Result<HealthStatus, ApiError> {
        let response = self
            .request(reqwest::Method::GET, "/api/health")
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), response.text().ok()));
        }
        Ok(response.json().unwrap_or_default())
    }

    /// Bearer-authenticated probe endpoint.
    pub fn private_probe(&self) -> Result<(), ApiError> {
        let response = self
            .request(reqwest::Method::GET, "/api/private")
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_response(status.as_u16(), response.text().ok()));
        }
        Ok(())
    }
}

/// API error taxonomy: transport, HTTP status, or payload shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    Network(String),
    Http { status: u16, message: String },
    Payload(String),
}

impl ApiError {
    fn from_response(status: u16, body: Option<String>) -> Self {
        let message = body
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        ApiError::Http { status, message }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "network error: {msg}"),
            ApiError::Http { status, message } => write!(f, "HTTP {status}: {message}"),
            ApiError::Payload(msg) => write!(f, "unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Canonical types
// =============================================================================

/// A position in a single security. Market value, change, and percent
/// change are derived, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Holding {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub shares: f64,
    pub avg_price: f64,
    pub current_price: f64,
}

impl Holding {
    /// Current price times shares.
    pub fn market_value(&self) -> f64 {
        self.current_price * self.shares
    }

    /// Average purchase price times shares.
    pub fn cost_basis(&self) -> f64 {
        self.avg_price * self.shares
    }

    /// Unrealized change versus cost basis.
    pub fn change(&self) -> f64 {
        (self.current_price - self.avg_price) * self.shares
    }

    /// Percent change versus cost basis. Zero cost basis reports 0.0.
    pub fn change_percent(&self) -> f64 {
        let basis = self.cost_basis();
        if basis.abs() < f64::EPSILON {
            0.0
        } else {
            self.change() / basis * 100.0
        }
    }
}

/// A news feed entry. Immutable, sourced wholesale from the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsItem {
    pub id: String,
    pub title: String,
    pub source: String,
    #[serde(rename = "publishedDate", alias = "published_at", alias = "published")]
    pub published: DateTime<Utc>,
    pub url: String,
}

/// One symbol-search hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SymbolMatch {
    pub symbol: String,
    pub name: String,
}

/// Body for `POST /api/holdings`.
#[derive(Debug, Clone, Serialize)]
pub struct NewHoldingRequest {
    pub symbol: String,
    pub shares: f64,
    pub avg_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthStatus {
    #[serde(default = "default_true")]
    pub core: bool,
    #[serde(default = "default_status")]
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            core: true,
            status: default_status(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_status() -> String {
    "ok".to_string()
}

// =============================================================================
// Wire-format adapter
// =============================================================================

/// Holding record as the backend sends it. Accepts every revision of the
/// backend's field naming; `into_holding` resolves the drift.
#[derive(Debug, Deserialize)]
pub struct RawHolding {
    pub id: String,
    pub symbol: String,
    #[serde(default)]
    pub name: Option<String>,
    pub shares: f64,
    #[serde(rename = "avgPrice", alias = "avg_price")]
    pub avg_price: f64,
    #[serde(default, rename = "currentPrice", alias = "current_price")]
    pub current_price: Option<f64>,
    #[serde(default, rename = "priceData", alias = "price_data")]
    pub price_data: Option<RawPriceData>,
}

#[derive(Debug, Deserialize)]
pub struct RawPriceData {
    pub last: f64,
}

impl RawHolding {
    /// Normalize into a [`Holding`]. The current price comes from the
    /// nested quote when present, else the flat field.
    pub fn into_holding(self) -> Result<Holding, ApiError> {
        let RawHolding {
            id,
            symbol,
            name,
            shares,
            avg_price,
            current_price,
            price_data,
        } = self;
        let current_price = price_data
            .map(|p| p.last)
            .or(current_price)
            .ok_or_else(|| ApiError::Payload(format!("holding {symbol} has no current price")))?;
        let name = name.unwrap_or_else(|| symbol.clone());
        Ok(Holding {
            id,
            symbol,
            name,
            shares,
            avg_price,
            current_price,
        })
    }
}
