//! Currency conversion service clients.
//!
//! [`ExchangeRateProvider`] is the contract the enrichment step needs from
//! the external conversion service: `(from, to, amount)` in, a
//! [`ConversionQuote`] out. A quote with `success == false` is a soft
//! failure that the caller logs; it never crashes the pipeline.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::Currency;
use crate::error::StatsError;

/// Result of one conversion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionQuote {
    /// Whether the service produced a usable quote.
    pub success: bool,
    /// Exchange rate `from -> to`.
    pub quote: f64,
    /// `amount` converted at `quote`.
    pub result: f64,
}

/// External currency conversion service.
#[async_trait]
pub trait ExchangeRateProvider: fmt::Debug + Send + Sync {
    /// Converts `amount` smallest units of `from` into `to`.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ExchangeRate`] when the service cannot be
    /// reached or answers with an unreadable body.
    async fn quote(
        &self,
        from: Currency,
        to: Currency,
        amount: i64,
    ) -> Result<ConversionQuote, StatsError>;
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    success: bool,
    #[serde(default)]
    info: ApiInfo,
    #[serde(default)]
    result: f64,
}

#[derive(Debug, Default, Deserialize)]
struct ApiInfo {
    #[serde(default)]
    quote: f64,
}

/// HTTP client for an `exchangerate.host`-style `convert` endpoint.
///
/// The configured endpoint already carries its query string (access key
/// etc.); `&from=..&to=..&amount=..&format=1` is appended per request.
#[derive(Debug, Clone)]
pub struct HttpExchangeRateProvider {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpExchangeRateProvider {
    /// Creates a client for `endpoint` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::Config`] if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, StatsError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StatsError::Config(format!("exchange rate client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn request_url(&self, from: Currency, to: Currency, amount: i64) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{separator}from={from}&to={to}&amount={amount}&format=1",
            self.endpoint
        )
    }
}

#[async_trait]
impl ExchangeRateProvider for HttpExchangeRateProvider {
    async fn quote(
        &self,
        from: Currency,
        to: Currency,
        amount: i64,
    ) -> Result<ConversionQuote, StatsError> {
        let url = self.request_url(from, to, amount);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| StatsError::ExchangeRate(e.to_string()))?;
        let body: ApiResponse = response
            .json()
            .await
            .map_err(|e| StatsError::ExchangeRate(format!("unreadable response: {e}")))?;

        Ok(ConversionQuote {
            success: body.success,
            quote: body.info.quote,
            result: body.result,
        })
    }
}

/// In-process provider with a static rate table.
///
/// Pairs without a rate answer with `success == false` unless a fallback
/// rate is configured. Every call is counted, which lets tests observe
/// cache hits.
#[derive(Debug, Default)]
pub struct FixedRateProvider {
    rates: HashMap<(Currency, Currency), f64>,
    fallback: Option<f64>,
    calls: AtomicUsize,
}

impl FixedRateProvider {
    /// Creates a provider without any rates.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider that quotes 1.0 for every pair.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            fallback: Some(1.0),
            ..Self::default()
        }
    }

    /// Adds a rate for `from -> to`.
    #[must_use]
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    /// Number of quotes served so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl ExchangeRateProvider for FixedRateProvider {
    #[allow(clippy::cast_precision_loss)]
    async fn quote(
        &self,
        from: Currency,
        to: Currency,
        amount: i64,
    ) -> Result<ConversionQuote, StatsError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let rate = self.rates.get(&(from, to)).copied().or(self.fallback);
        Ok(match rate {
            Some(quote) => ConversionQuote {
                success: true,
                quote,
                result: quote * amount as f64,
            },
            None => ConversionQuote {
                success: false,
                quote: 0.0,
                result: 0.0,
            },
        })
    }
}
