use rust_decimal::Decimal;
use serde::Serialize;

use crate::constants::{
    COLLATERAL_FACTOR, LOW_RISK_MIN_HEALTH_FACTOR, MEDIUM_RISK_MIN_HEALTH_FACTOR, PERCENT,
};
use crate::position::{Position, PositionKind};

/// Coarse classification of how close the portfolio is to liquidation,
/// derived from the portfolio health factor by fixed breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LiquidationRisk {
    Low,
    Medium,
    High,
}

impl LiquidationRisk {
    pub fn from_health_factor(health_factor: Decimal) -> Self {
        if health_factor >= LOW_RISK_MIN_HEALTH_FACTOR {
            LiquidationRisk::Low
        } else if health_factor >= MEDIUM_RISK_MIN_HEALTH_FACTOR {
            LiquidationRisk::Medium
        } else {
            LiquidationRisk::High
        }
    }
}

/// Portfolio-level metrics derived from the current position set. Recomputed
/// from scratch on every call; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    #[serde(rename = "totalSuppliedUSD")]
    pub total_supplied_usd: Decimal,
    #[serde(rename = "totalBorrowedUSD")]
    pub total_borrowed_usd: Decimal,
    #[serde(rename = "netValueUSD")]
    pub net_value_usd: Decimal,
    pub weighted_supply_apy: Decimal,
    pub weighted_borrow_apy: Decimal,
    pub net_apy: Decimal,
    #[serde(rename = "collateralUSD")]
    pub collateral_usd: Decimal,
    #[serde(rename = "borrowLimitUSD")]
    pub borrow_limit_usd: Decimal,
    pub borrow_limit_used: Decimal, // Percent of the borrow limit currently drawn
    pub health_factor: Option<Decimal>,
    pub liquidation_risk: Option<LiquidationRisk>,
}

/// Fold the position set into a `PortfolioSummary`.
///
/// Pure and order-insensitive. Zero-valued partitions produce zero rates
/// rather than dividing by zero; a portfolio with no borrow health factors
/// reports no health factor (and no risk) rather than an error.
pub fn summarize(positions: &[Position]) -> PortfolioSummary {
    let mut total_supplied_usd = Decimal::ZERO;
    let mut total_borrowed_usd = Decimal::ZERO;
    let mut supply_apy_weighted = Decimal::ZERO; // Σ apy × amountUSD over supplies
    let mut borrow_apy_weighted = Decimal::ZERO; // Σ apy × amountUSD over borrows
    let mut collateral_usd = Decimal::ZERO;
    let mut health_factor: Option<Decimal> = None;

    for position in positions {
        match position.kind {
            PositionKind::Supply => {
                total_supplied_usd += position.amount_usd;
                supply_apy_weighted += position.apy * position.amount_usd;
                if position.counts_as_collateral() {
                    collateral_usd += position.amount_usd;
                }
            }
            PositionKind::Borrow => {
                total_borrowed_usd += position.amount_usd;
                borrow_apy_weighted += position.apy * position.amount_usd;
                // The weakest borrow position dominates portfolio risk
                if let Some(hf) = position.health_factor {
                    health_factor = Some(match health_factor {
                        Some(current) => current.min(hf),
                        None => hf,
                    });
                }
            }
        }
    }

    let weighted_supply_apy = if total_supplied_usd > Decimal::ZERO {
        supply_apy_weighted / total_supplied_usd
    } else {
        Decimal::ZERO
    };
    let weighted_borrow_apy = if total_borrowed_usd > Decimal::ZERO {
        borrow_apy_weighted / total_borrowed_usd
    } else {
        Decimal::ZERO
    };

    let total_exposure = total_supplied_usd + total_borrowed_usd;
    let net_apy = if total_exposure > Decimal::ZERO {
        (weighted_supply_apy * total_supplied_usd - weighted_borrow_apy * total_borrowed_usd)
            / total_exposure
    } else {
        Decimal::ZERO
    };

    let borrow_limit_usd = collateral_usd * COLLATERAL_FACTOR;
    let borrow_limit_used = if borrow_limit_usd > Decimal::ZERO {
        total_borrowed_usd / borrow_limit_usd * PERCENT
    } else {
        Decimal::ZERO
    };

    PortfolioSummary {
        total_supplied_usd,
        total_borrowed_usd,
        net_value_usd: total_supplied_usd - total_borrowed_usd,
        weighted_supply_apy,
        weighted_borrow_apy,
        net_apy,
        collateral_usd,
        borrow_limit_usd,
        borrow_limit_used,
        health_factor,
        liquidation_risk: health_factor.map(LiquidationRisk::from_health_factor),
    }
}

/// Flip `collateral_enabled` on the supply position matching `position_id`.
///
/// Returns true if a position changed. Borrow positions and unknown ids are
/// left untouched; the on-chain enter/exit-market call is the write layer's
/// job, this only transforms the local position set.
pub fn toggle_collateral(positions: &mut [Position], position_id: &str) -> bool {
    let Some(position) = positions.iter_mut().find(|p| p.id == position_id) else {
        return false;
    };
    if !position.is_supply() {
        return false;
    }
    position.collateral_enabled = Some(!position.collateral_enabled.unwrap_or(false));
    true
}
