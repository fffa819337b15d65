//! reqwest-backed [`Backend`] implementation plus the pure response-decoding
//! helpers it is built from.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::config::Settings;
use crate::error::FetchError;
use crate::types::{Account, ActionReceipt, BotStatus, Order, Position, PricePoint};

use super::Backend;
use super::endpoints::{self, HistoryQuery, OrdersQuery};

// ---------------------------------------------------------------------------
// HttpBackend
// ---------------------------------------------------------------------------

/// HTTP client for the dashboard backend.
///
/// Cheap to clone; reqwest pools connections internally.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: Client,
    base_url: String,
}

impl HttpBackend {
    /// Build a client against `settings.base_url`.
    ///
    /// # Errors
    ///
    /// Fails if the base URL is not an absolute http(s) URL.
    pub fn new(settings: &Settings) -> Result<Self> {
        let parsed = Url::parse(&settings.base_url)
            .with_context(|| format!("invalid backend base URL '{}'", settings.base_url))?;
        anyhow::ensure!(
            matches!(parsed.scheme(), "http" | "https"),
            "backend base URL must be http(s), got '{}'",
            parsed.scheme()
        );
        Ok(Self {
            http: Client::new(),
            base_url: settings.base_url.clone(),
        })
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("[http] {method} {url}");

        let response = self
            .http
            .request(method, url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

        decode_response(status, &body)
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn bot_status(&self) -> Result<BotStatus, FetchError> {
        self.request(Method::GET, endpoints::BOT_STATUS).await
    }

    async fn account(&self) -> Result<Account, FetchError> {
        self.request(Method::GET, endpoints::ACCOUNT).await
    }

    async fn positions(&self) -> Result<Vec<Position>, FetchError> {
        self.request(Method::GET, endpoints::POSITIONS).await
    }

    async fn orders(&self, query: &OrdersQuery) -> Result<Vec<Order>, FetchError> {
        self.request(Method::GET, &endpoints::orders(query)).await
    }

    async fn history(&self, query: &HistoryQuery) -> Result<Vec<PricePoint>, FetchError> {
        self.request(Method::GET, &endpoints::history(query)).await
    }

    async fn start_bot(&self, symbol: &str) -> Result<ActionReceipt, FetchError> {
        self.request(Method::POST, &endpoints::bot_start(symbol))
            .await
    }

    async fn stop_bot(&self) -> Result<ActionReceipt, FetchError> {
        self.request(Method::POST, endpoints::BOT_STOP).await
    }
}

// ---------------------------------------------------------------------------
// Response decoding
// ---------------------------------------------------------------------------

/// Decode one backend response.
///
/// Success statuses decode the body as `T`; anything else becomes
/// [`FetchError::Http`] carrying the best available message.
pub fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: &[u8],
) -> Result<T, FetchError> {
    if !status.is_success() {
        return Err(FetchError::Http {
            status: status.as_u16(),
            message: error_detail(status, body),
        });
    }
    serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))
}

/// Best-effort extraction of the backend's error message.
///
/// Failures come back as `{"detail": "..."}`. When the body is some other
/// shape (reverse proxies, hard crashes), fall back to the status reason
/// phrase.
pub fn error_detail(status: StatusCode, body: &[u8]) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: Option<String>,
    }

    if let Ok(ErrorBody {
        detail: Some(detail),
    }) = serde_json::from_slice::<ErrorBody>(body)
    {
        return detail;
    }
    status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string()
}
