pub mod aggregator;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod position;
pub mod registry;
