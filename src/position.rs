use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants::{DAYS_PER_YEAR, PERCENT};

/// Metadata for the asset behind a position. Addresses are carried as opaque
/// strings; the on-chain read layer owns their interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    pub symbol: String,
    pub chain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_address: Option<String>, // Address of the lending market (pToken) wrapping the asset
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PositionKind {
    Supply,
    Borrow,
}

/// One user holding in one lending market.
///
/// `amount_usd` is `amount` priced in USD at read time; prices are fetched by
/// the external read layer and trusted as-is here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub asset: Asset,
    pub kind: PositionKind,
    pub amount: Decimal,
    #[serde(rename = "amountUSD")]
    pub amount_usd: Decimal,
    pub apy: Decimal, // Percent units, e.g. 4.25 for 4.25%
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accrued_interest: Decimal, // In units of the underlying asset, negative for borrows
    #[serde(default, rename = "accruedInterestUSD")]
    pub accrued_interest_usd: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_factor: Option<Decimal>, // Borrow positions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub liquidation_price: Option<Decimal>, // Borrow positions only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collateral_enabled: Option<bool>, // Supply positions only
}

impl Position {
    pub fn is_supply(&self) -> bool {
        matches!(self.kind, PositionKind::Supply)
    }

    pub fn is_borrow(&self) -> bool {
        matches!(self.kind, PositionKind::Borrow)
    }

    /// Whether this position counts toward the user's borrowing power.
    pub fn counts_as_collateral(&self) -> bool {
        self.is_supply() && self.collateral_enabled.unwrap_or(false)
    }

    /// Whole days since the position was opened, rounded up. None if the open
    /// timestamp was never recorded.
    pub fn days_open(&self, now: DateTime<Utc>) -> Option<i64> {
        let opened_at = self.opened_at?;
        let seconds = (now - opened_at).num_seconds().abs();
        Some((seconds + 86_399) / 86_400)
    }

    /// Simple-interest estimate of USD earnings over `days` at the current
    /// APY. Negative for borrow positions (interest is a cost).
    pub fn estimated_earnings_usd(&self, days: Decimal) -> Decimal {
        let daily_rate = self.apy / PERCENT / DAYS_PER_YEAR;
        let estimate = self.amount_usd * daily_rate * days;
        match self.kind {
            PositionKind::Supply => estimate,
            PositionKind::Borrow => -estimate,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PositionKind::Supply => "SUPPLY",
            PositionKind::Borrow => "BORROW",
        };
        write!(
            f,
            "{} {} {} on {} (${}) @ {}% APY",
            kind, self.amount, self.asset.symbol, self.asset.chain, self.amount_usd, self.apy
        )
    }
}
