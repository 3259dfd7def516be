use rust_decimal::{Decimal, dec};

// Liquidation risk breakpoints on the portfolio health factor
pub const LOW_RISK_MIN_HEALTH_FACTOR: Decimal = dec!(2.0);
pub const MEDIUM_RISK_MIN_HEALTH_FACTOR: Decimal = dec!(1.5);

// Fraction of collateral-enabled supply value that counts toward the borrow limit
pub const COLLATERAL_FACTOR: Decimal = dec!(0.80);

pub const DAYS_PER_YEAR: Decimal = dec!(365);
pub const PERCENT: Decimal = dec!(100);
