use eyre::Result;
use tracing::info;

use lending_portfolio_aggregator::config::Config;
use lending_portfolio_aggregator::logging;
use lending_portfolio_aggregator::registry::PositionRegistry;

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    logging::init_logging();

    // Load configuration
    let cfg = Config::load();
    println!("Running in {} mode", cfg.mode);

    // Initialize position registry
    let mut registry = PositionRegistry::new();

    if cfg.mode == "demo" {
        let loaded = registry.load_from_file(&cfg.positions_file)?;
        println!("Loaded {} positions from {}", loaded, cfg.positions_file);
    } else {
        // Live mode starts empty until the on-chain read layer pushes positions
        info!("Live mode: waiting on the read layer, reporting an empty portfolio");
    }

    for position in registry.positions() {
        println!("{}", position);
    }

    let summary = registry.summary();
    println!("Total supplied:     ${}", summary.total_supplied_usd);
    println!("Total borrowed:     ${}", summary.total_borrowed_usd);
    println!("Net value:          ${}", summary.net_value_usd);
    println!("Weighted supply APY: {}%", summary.weighted_supply_apy.round_dp(2));
    println!("Weighted borrow APY: {}%", summary.weighted_borrow_apy.round_dp(2));
    println!("Net APY:             {}%", summary.net_apy.round_dp(2));
    println!("Borrow limit:       ${} ({}% used)", summary.borrow_limit_usd, summary.borrow_limit_used.round_dp(1));
    if let (Some(hf), Some(risk)) = (summary.health_factor, summary.liquidation_risk) {
        println!("Health factor:       {} ({:?} risk)", hf, risk);
    } else {
        println!("Health factor:       n/a (no open borrow positions)");
    }

    Ok(())
}
