//! Chart-ready derivations over a portfolio snapshot.
//!
//! Everything here is a pure function of the snapshot it is handed. There
//! is no cached state that could diverge from the store; callers recompute
//! on demand.

use crate::types::{AllocationBucket, Portfolio, Position, RiskRewardPoint};
use serde::{Deserialize, Serialize};

/// Group position value by a classification field.
///
/// Bucket order follows the first occurrence of each key in the
/// portfolio's display order.
fn allocate<'a, F>(portfolio: &'a Portfolio, key: F) -> Vec<AllocationBucket>
where
    F: Fn(&'a Position) -> &'a str,
{
    let mut buckets: Vec<AllocationBucket> = Vec::new();

    for position in &portfolio.positions {
        let k = key(position);
        match buckets.iter_mut().find(|b| b.key == k) {
            Some(bucket) => bucket.value += position.value(),
            None => buckets.push(AllocationBucket {
                key: k.to_string(),
                value: position.value(),
            }),
        }
    }

    buckets
}

/// Position value summed per sector.
pub fn sector_allocation(portfolio: &Portfolio) -> Vec<AllocationBucket> {
    allocate(portfolio, |p| &p.sector)
}

/// Position value summed per market-cap category.
pub fn market_cap_distribution(portfolio: &Portfolio) -> Vec<AllocationBucket> {
    allocate(portfolio, |p| &p.market_cap_category)
}

/// One scatter point per position: volatility as risk, one-year return as
/// reward, position value as an unscaled size hint.
pub fn risk_reward_series(portfolio: &Portfolio) -> Vec<RiskRewardPoint> {
    portfolio
        .positions
        .iter()
        .map(|p| RiskRewardPoint {
            label: p.symbol.clone(),
            risk: p.volatility,
            reward: p.one_year_return,
            weight: p.value(),
        })
        .collect()
}

/// All derived views bundled for one-shot consumers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    /// Total portfolio value
    pub total_value: f64,
    /// Number of positions
    pub position_count: usize,
    /// Sector allocation buckets
    pub sectors: Vec<AllocationBucket>,
    /// Market-cap distribution buckets
    pub market_caps: Vec<AllocationBucket>,
    /// Risk/reward scatter series
    pub risk_reward: Vec<RiskRewardPoint>,
}

impl PortfolioAnalysis {
    /// Derive the full analysis from a portfolio snapshot.
    pub fn from_portfolio(portfolio: &Portfolio) -> Self {
        Self {
            total_value: portfolio.computed_total(),
            position_count: portfolio.position_count(),
            sectors: sector_allocation(portfolio),
            market_caps: market_cap_distribution(portfolio),
            risk_reward: risk_reward_series(portfolio),
        }
    }
}
