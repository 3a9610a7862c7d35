//! Return and volatility calculations over daily close-price series.
//!
//! Pure functions: the same input always yields the same output. Series
//! too short for a meaningful result yield zeros rather than errors, so
//! a symbol with missing history still produces a usable position.

use serde::{Deserialize, Serialize};

/// Trading days per year used for annualization.
pub const TRADING_DAYS: f64 = 252.0;

/// Total-period return in percent: `(last - first) / first * 100`.
///
/// Returns 0.0 for fewer than two closes, or when the first close is zero
/// (undefined growth, guarded rather than propagated).
pub fn total_return(closes: &[f64]) -> f64 {
    if closes.len() < 2 {
        return 0.0;
    }

    let first = closes[0];
    let last = closes[closes.len() - 1];

    if first == 0.0 {
        return 0.0;
    }

    (last - first) / first * 100.0
}

/// Daily simple returns: `r[i] = (close[i] - close[i-1]) / close[i-1]`.
///
/// A zero previous close contributes no sample.
pub fn daily_returns(closes: &[f64]) -> Vec<f64> {
    let mut returns = Vec::with_capacity(closes.len().saturating_sub(1));

    for i in 1..closes.len() {
        if closes[i - 1] != 0.0 {
            returns.push((closes[i] - closes[i - 1]) / closes[i - 1]);
        }
    }

    returns
}

/// Annualized volatility in percent from daily returns.
///
/// Standard deviation of the returns (population variance, denominator n)
/// scaled by sqrt(252) and expressed as a percentage. Empty input yields 0.
pub fn annualized_volatility(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

    variance.sqrt() * TRADING_DAYS.sqrt() * 100.0
}

/// Packaged return/volatility result for one symbol's history.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ReturnProfile {
    /// Total-period return in percent
    pub one_year_return: f64,
    /// Annualized volatility in percent
    pub volatility: f64,
}

impl ReturnProfile {
    /// Derive both metrics from a chronologically ordered close series.
    pub fn from_closes(closes: &[f64]) -> Self {
        Self {
            one_year_return: total_return(closes),
            volatility: annualized_volatility(&daily_returns(closes)),
        }
    }
}
