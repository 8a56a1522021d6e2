//! Enrichment collaborators: currency conversion and player lookups.
//!
//! The publisher depends only on the [`ExchangeRateProvider`] and
//! [`PlayerDirectory`] traits; concrete clients are chosen at startup.

pub mod cache;
pub mod converter;
pub mod directory;
pub mod rates;

pub use cache::TtlCache;
pub use converter::EnrichmentCache;
pub use directory::{InMemoryPlayerDirectory, PgPlayerDirectory, PlayerDirectory};
pub use rates::{ConversionQuote, ExchangeRateProvider, FixedRateProvider, HttpExchangeRateProvider};
