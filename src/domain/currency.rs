//! Static currency table.
//!
//! Every monetary amount in the pipeline is an integer count of the
//! currency's smallest unit (cents, satoshis). [`Currency::smallest_unit`]
//! gives the factor that turns such a count into display units, and
//! [`Currency::REFERENCE`] is the currency all top-N statistics are
//! normalized into.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StatsError;

/// Supported currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Euro, 1 cent.
    Eur,
    /// US dollar, 1 cent.
    Usd,
    /// Pound sterling, 1 penny.
    Gbp,
    /// New Zealand dollar, 1 cent.
    Nzd,
    /// Bitcoin, 1 satoshi.
    Btc,
}

impl Currency {
    /// Aggregation and reporting currency.
    pub const REFERENCE: Self = Self::Eur;

    /// All supported currencies, reference currency first.
    pub const ALL: [Self; 5] = [Self::Eur, Self::Usd, Self::Gbp, Self::Nzd, Self::Btc];

    /// Returns the ISO-style currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Eur => "EUR",
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Nzd => "NZD",
            Self::Btc => "BTC",
        }
    }

    /// Value of one smallest unit expressed in display units.
    #[must_use]
    pub const fn smallest_unit(self) -> f64 {
        match self {
            Self::Btc => 0.000_000_01,
            Self::Eur | Self::Usd | Self::Gbp | Self::Nzd => 0.01,
        }
    }

    /// Number of decimal places shown when rendering an amount.
    #[must_use]
    pub const fn decimals(self) -> usize {
        match self {
            Self::Btc => 8,
            Self::Eur | Self::Usd | Self::Gbp | Self::Nzd => 2,
        }
    }

    /// Converts a smallest-unit count into display units.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn to_display_units(self, amount: i64) -> f64 {
        amount as f64 * self.smallest_unit()
    }

    /// Renders an amount with the currency's precision, e.g. `"3.00 EUR"`.
    #[must_use]
    pub fn format_amount(self, amount: i64) -> String {
        format!(
            "{:.*} {}",
            self.decimals(),
            self.to_display_units(amount),
            self.code()
        )
    }

    /// Returns `true` for the reference currency.
    #[must_use]
    pub const fn is_reference(self) -> bool {
        matches!(self, Self::Eur)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s))
            .ok_or_else(|| StatsError::InvalidRequest(format!("unknown currency: {s}")))
    }
}
