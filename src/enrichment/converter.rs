//! TTL-memoized currency conversion.

use std::sync::Arc;
use std::time::Duration;

use super::cache::TtlCache;
use super::rates::ExchangeRateProvider;
use crate::domain::Currency;
use crate::error::StatsError;

/// Currency conversion with a short-lived rate cache in front of the
/// external [`ExchangeRateProvider`].
///
/// - `from == to` returns the amount unchanged without any lookup.
/// - A cached `(from, to)` rate is trusted only within its TTL.
/// - On miss or expiry the provider is called and its quote re-cached.
#[derive(Debug)]
pub struct EnrichmentCache {
    provider: Arc<dyn ExchangeRateProvider>,
    rates: TtlCache<(Currency, Currency), f64>,
}

impl EnrichmentCache {
    /// Creates a converter whose cached rates live for `ttl`.
    #[must_use]
    pub fn new(provider: Arc<dyn ExchangeRateProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            rates: TtlCache::new(ttl),
        }
    }

    /// Converts `amount` from one currency into another.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::ExchangeRate`] if the provider fails or
    /// reports an unsuccessful conversion; nothing is cached in that case.
    #[allow(clippy::cast_precision_loss)]
    pub async fn convert(
        &self,
        from: Currency,
        to: Currency,
        amount: i64,
    ) -> Result<f64, StatsError> {
        if from == to {
            return Ok(amount as f64);
        }

        if let Some(rate) = self.rates.get(&(from, to)) {
            tracing::trace!(%from, %to, rate, "exchange rate cache hit");
            return Ok(rate * amount as f64);
        }

        let quote = self.provider.quote(from, to, amount).await?;
        if !quote.success {
            return Err(StatsError::ExchangeRate(format!(
                "conversion {from} -> {to} was not successful"
            )));
        }

        self.rates.insert((from, to), quote.quote);
        tracing::debug!(%from, %to, rate = quote.quote, "exchange rate cached");
        Ok(quote.result)
    }

    /// Converts `amount` into the reference currency, rounded to whole
    /// smallest units.
    ///
    /// # Errors
    ///
    /// See [`EnrichmentCache::convert`].
    #[allow(clippy::cast_possible_truncation)]
    pub async fn to_reference(&self, currency: Currency, amount: i64) -> Result<i64, StatsError> {
        if currency.is_reference() {
            return Ok(amount);
        }
        let converted = self.convert(currency, Currency::REFERENCE, amount).await?;
        Ok(converted.round() as i64)
    }

    /// Number of cached rates, expired ones included.
    #[must_use]
    pub fn cached_rates(&self) -> usize {
        self.rates.len()
    }
}
