//! Core data types for the Marketdeck portfolio engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn unknown() -> String {
    "Unknown".to_string()
}

/// A held security: quantity, valuation and classification metadata.
///
/// `symbol` is the primary key within a portfolio and is compared
/// case-sensitively, exactly as stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Ticker symbol (case-sensitive, unique within a portfolio)
    pub symbol: String,
    /// Display name, defaults to the symbol
    #[serde(default)]
    pub name: String,
    /// Number of shares held (integer or fractional, always positive)
    pub quantity: f64,
    /// Acquisition price used for valuation.
    ///
    /// Re-adding a symbol overwrites this with the latest fetch; it is
    /// NOT a cost-basis average across buys.
    pub reference_price: f64,
    /// Sector classification, "Unknown" when unavailable
    #[serde(default = "unknown")]
    pub sector: String,
    /// Raw market capitalization, 0 when unknown
    #[serde(default)]
    pub market_cap: f64,
    /// Market-cap bucket (e.g. "Large Cap"), "Unknown" when unavailable
    #[serde(default = "unknown")]
    pub market_cap_category: String,
    /// Trailing one-year return in percent, 0 when history is unavailable
    #[serde(default)]
    pub one_year_return: f64,
    /// Annualized volatility in percent, 0 when history is unavailable
    #[serde(default)]
    pub volatility: f64,
}

impl Position {
    /// Create a position with unclassified metadata.
    pub fn new(symbol: &str, quantity: f64, reference_price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            quantity,
            reference_price,
            sector: unknown(),
            market_cap: 0.0,
            market_cap_category: unknown(),
            one_year_return: 0.0,
            volatility: 0.0,
        }
    }

    /// Set sector and market-cap classification.
    pub fn with_classification(mut self, sector: &str, market_cap: f64, category: &str) -> Self {
        self.sector = sector.to_string();
        self.market_cap = market_cap;
        self.market_cap_category = category.to_string();
        self
    }

    /// Set the derived return/volatility percentages.
    pub fn with_profile(mut self, one_year_return: f64, volatility: f64) -> Self {
        self.one_year_return = one_year_return;
        self.volatility = volatility;
        self
    }

    /// Current valuation of this position.
    pub fn value(&self) -> f64 {
        self.quantity * self.reference_price
    }
}

/// The ordered collection of a user's positions plus derived total value.
///
/// Insertion order is the display order. `total_value` is recomputed by
/// every store mutation and on load; it is never trusted from disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Portfolio {
    /// Held positions, at most one per symbol
    pub positions: Vec<Position>,
    /// Sum of `quantity * reference_price` over all positions
    #[serde(default)]
    pub total_value: f64,
    /// When the portfolio was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the portfolio was last updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Portfolio {
    /// Create a new empty portfolio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recalculate the total value from the current positions.
    pub fn computed_total(&self) -> f64 {
        self.positions.iter().map(|p| p.value()).sum()
    }

    /// Find a position by exact symbol.
    pub fn find(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    /// Get the number of positions.
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the portfolio holds no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A grouping-and-sum result keyed by a classification field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationBucket {
    /// Classification value (sector name or market-cap category)
    pub key: String,
    /// Summed position value for the group
    pub value: f64,
}

/// One scatter point per position for risk/reward visualization.
///
/// `weight` is a relative-size hint only; callers scale it into a
/// presentation range themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskRewardPoint {
    /// Position symbol
    pub label: String,
    /// Annualized volatility in percent
    pub risk: f64,
    /// One-year return in percent
    pub reward: f64,
    /// Position value (always >= 0)
    pub weight: f64,
}

/// API response wrapper for success cases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_new_defaults() {
        let pos = Position::new("RELIANCE.NS", 10.0, 2500.0);
        assert_eq!(pos.symbol, "RELIANCE.NS");
        assert_eq!(pos.sector, "Unknown");
        assert_eq!(pos.market_cap_category, "Unknown");
        assert_eq!(pos.one_year_return, 0.0);
        assert_eq!(pos.value(), 25000.0);
    }

    #[test]
    fn test_position_symbol_case_preserved() {
        let pos = Position::new("brk.b", 1.0, 400.0);
        assert_eq!(pos.symbol, "brk.b");
    }

    #[test]
    fn test_position_builders() {
        let pos = Position::new("TCS", 2.0, 3500.0)
            .with_classification("IT", 1.2e12, "Large Cap")
            .with_profile(14.5, 22.1);

        assert_eq!(pos.sector, "IT");
        assert_eq!(pos.market_cap_category, "Large Cap");
        assert_eq!(pos.one_year_return, 14.5);
        assert_eq!(pos.volatility, 22.1);
    }

    #[test]
    fn test_portfolio_computed_total() {
        let mut portfolio = Portfolio::new();
        portfolio.positions.push(Position::new("A", 2.0, 100.0));
        portfolio.positions.push(Position::new("B", 1.0, 50.0));

        assert_eq!(portfolio.computed_total(), 250.0);
    }

    #[test]
    fn test_position_deserialize_missing_metadata() {
        // Minimal legacy record: classification and profile fields absent.
        let json = r#"{"symbol":"INFY","quantity":3,"reference_price":1500}"#;
        let pos: Position = serde_json::from_str(json).unwrap();

        assert_eq!(pos.sector, "Unknown");
        assert_eq!(pos.market_cap_category, "Unknown");
        assert_eq!(pos.volatility, 0.0);
        assert_eq!(pos.value(), 4500.0);
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
