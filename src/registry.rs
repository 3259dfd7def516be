use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::aggregator::{self, PortfolioSummary};
use crate::error::PortfolioError;
use crate::position::Position;

/// Top-level shape of a positions fixture file.
#[derive(Debug, Deserialize)]
struct PositionsFile {
    positions: Vec<Position>,
}

/// Owns the current position set for one account and derives the portfolio
/// summary from it. Positions arrive either from a demo fixture file or
/// wholesale from the on-chain read layer via `replace_all`.
#[derive(Debug, Default)]
pub struct PositionRegistry {
    positions: HashMap<String, Position>,
}

impl PositionRegistry {
    pub fn new() -> Self {
        Self {
            positions: HashMap::new(),
        }
    }

    pub fn num_positions(&self) -> usize {
        self.positions.len()
    }

    pub fn get_position(&self, id: &str) -> Option<&Position> {
        self.positions.get(id)
    }

    /// Snapshot of all positions, sorted by id for stable reporting output.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.positions.values().cloned().collect();
        positions.sort_by(|a, b| a.id.cmp(&b.id));
        positions
    }

    /// Load positions from a JSON fixture file, replacing the current set.
    /// Returns the number of positions loaded.
    #[instrument(skip(self, path), fields(file = %path.as_ref().display()))]
    pub fn load_from_file(&mut self, path: impl AsRef<Path>) -> Result<usize, PortfolioError> {
        info!("Loading positions from file");
        let file_content = fs::read_to_string(path)?;
        let parsed: PositionsFile = serde_json::from_str(&file_content)?;

        let mut positions = HashMap::with_capacity(parsed.positions.len());
        for position in parsed.positions {
            let id = position.id.clone();
            debug!(
                id = %id,
                symbol = %position.asset.symbol,
                kind = ?position.kind,
                amount_usd = %position.amount_usd,
                "Loaded position"
            );
            if positions.insert(id.clone(), position).is_some() {
                return Err(PortfolioError::DuplicatePosition(id));
            }
        }
        self.positions = positions;
        info!(loaded_count = self.positions.len(), "Positions loaded from file");
        Ok(self.positions.len())
    }

    /// Replace the whole position set, e.g. after a refresh from the on-chain
    /// read layer. Later records win on duplicate ids.
    #[instrument(skip(self, positions), fields(count = positions.len()))]
    pub fn replace_all(&mut self, positions: Vec<Position>) {
        self.positions = positions
            .into_iter()
            .map(|position| (position.id.clone(), position))
            .collect();
        debug!(count = self.positions.len(), "Replaced position set");
    }

    /// Flip the collateral flag on a supply position. Returns true if a
    /// position changed; borrow positions and unknown ids are no-ops.
    #[instrument(skip(self))]
    pub fn toggle_collateral(&mut self, position_id: &str) -> bool {
        match self.positions.get_mut(position_id) {
            Some(position) if position.is_supply() => {
                let enabled = !position.collateral_enabled.unwrap_or(false);
                position.collateral_enabled = Some(enabled);
                debug!(position_id, enabled, "Toggled collateral");
                true
            }
            Some(_) => {
                warn!(position_id, "Ignoring collateral toggle on borrow position");
                false
            }
            None => {
                warn!(position_id, "Ignoring collateral toggle for unknown position");
                false
            }
        }
    }

    /// Recompute the portfolio summary from the current position set.
    pub fn summary(&self) -> PortfolioSummary {
        aggregator::summarize(&self.positions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::LiquidationRisk;
    use crate::position::{Asset, PositionKind};
    use rust_decimal::{Decimal, dec};

    fn position(id: &str, kind: PositionKind, amount_usd: Decimal, apy: Decimal) -> Position {
        Position {
            id: id.to_string(),
            asset: Asset {
                name: "USD Coin".to_string(),
                symbol: "USDC".to_string(),
                chain: "Ethereum".to_string(),
                contract_address: None,
                market_address: None,
            },
            kind,
            amount: amount_usd,
            amount_usd,
            apy,
            opened_at: None,
            accrued_interest: Decimal::ZERO,
            accrued_interest_usd: Decimal::ZERO,
            health_factor: match kind {
                PositionKind::Borrow => Some(dec!(2.8)),
                PositionKind::Supply => None,
            },
            liquidation_price: None,
            collateral_enabled: match kind {
                PositionKind::Supply => Some(true),
                PositionKind::Borrow => None,
            },
        }
    }

    fn fixture_json() -> String {
        serde_json::json!({
            "positions": [
                {
                    "id": "position-1",
                    "asset": {"name": "USD Coin", "symbol": "USDC", "chain": "Ethereum"},
                    "kind": "supply",
                    "amount": "5000",
                    "amountUSD": "5000",
                    "apy": "4.25",
                    "collateralEnabled": true
                },
                {
                    "id": "position-2",
                    "asset": {"name": "Tether USD", "symbol": "USDT", "chain": "Ethereum"},
                    "kind": "borrow",
                    "amount": "1200",
                    "amountUSD": "1200",
                    "apy": "7.2",
                    "healthFactor": "1.3"
                }
            ]
        })
        .to_string()
    }

    #[test]
    fn loads_positions_from_fixture_file() {
        let path = std::env::temp_dir().join("registry_load_test_positions.json");
        fs::write(&path, fixture_json()).unwrap();

        let mut registry = PositionRegistry::new();
        let loaded = registry.load_from_file(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded, 2);
        let supply = registry.get_position("position-1").unwrap();
        assert_eq!(supply.amount_usd, dec!(5000));
        assert_eq!(supply.collateral_enabled, Some(true));

        let summary = registry.summary();
        assert_eq!(summary.total_supplied_usd, dec!(5000));
        assert_eq!(summary.total_borrowed_usd, dec!(1200));
        assert_eq!(summary.liquidation_risk, Some(LiquidationRisk::High));
    }

    #[test]
    fn load_rejects_duplicate_position_ids() {
        let json = serde_json::json!({
            "positions": [
                {
                    "id": "position-1",
                    "asset": {"name": "USD Coin", "symbol": "USDC", "chain": "Ethereum"},
                    "kind": "supply",
                    "amount": "1",
                    "amountUSD": "1",
                    "apy": "1"
                },
                {
                    "id": "position-1",
                    "asset": {"name": "USD Coin", "symbol": "USDC", "chain": "Ethereum"},
                    "kind": "supply",
                    "amount": "2",
                    "amountUSD": "2",
                    "apy": "2"
                }
            ]
        });
        let path = std::env::temp_dir().join("registry_duplicate_test_positions.json");
        fs::write(&path, json.to_string()).unwrap();

        let mut registry = PositionRegistry::new();
        let result = registry.load_from_file(&path);
        fs::remove_file(&path).ok();

        assert!(matches!(result, Err(PortfolioError::DuplicatePosition(_))));
        assert_eq!(registry.num_positions(), 0);
    }

    #[test]
    fn replace_all_swaps_the_whole_set() {
        let mut registry = PositionRegistry::new();
        registry.replace_all(vec![position("a", PositionKind::Supply, dec!(100), dec!(4))]);
        assert_eq!(registry.num_positions(), 1);

        registry.replace_all(vec![
            position("b", PositionKind::Supply, dec!(200), dec!(5)),
            position("c", PositionKind::Borrow, dec!(50), dec!(8)),
        ]);
        assert_eq!(registry.num_positions(), 2);
        assert!(registry.get_position("a").is_none());
        assert_eq!(registry.summary().total_supplied_usd, dec!(200));
    }

    #[test]
    fn toggle_updates_the_summary_borrow_limit() {
        let mut registry = PositionRegistry::new();
        registry.replace_all(vec![
            position("a", PositionKind::Supply, dec!(10000), dec!(4)),
            position("c", PositionKind::Borrow, dec!(4000), dec!(6)),
        ]);
        assert_eq!(registry.summary().borrow_limit_usd, dec!(8000));

        assert!(registry.toggle_collateral("a"));
        assert_eq!(registry.summary().borrow_limit_usd, Decimal::ZERO);
        assert_eq!(registry.summary().borrow_limit_used, Decimal::ZERO);

        assert!(!registry.toggle_collateral("c"));
        assert!(!registry.toggle_collateral("missing"));
    }

    #[test]
    fn positions_snapshot_is_sorted_by_id() {
        let mut registry = PositionRegistry::new();
        registry.replace_all(vec![
            position("z", PositionKind::Supply, dec!(1), dec!(1)),
            position("a", PositionKind::Supply, dec!(2), dec!(2)),
            position("m", PositionKind::Borrow, dec!(3), dec!(3)),
        ]);
        let ids: Vec<String> = registry.positions().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["a", "m", "z"]);
    }
}
