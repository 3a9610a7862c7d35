//! Portfolio management module.
//!
//! Provides the canonical portfolio store, the merge rule, persistence
//! backends and the derived analytics views.

pub mod analytics;
mod store;

pub use analytics::{
    market_cap_distribution, risk_reward_series, sector_allocation, PortfolioAnalysis,
};
pub use store::{JsonFileStorage, MemoryStorage, PortfolioStore, Storage};
