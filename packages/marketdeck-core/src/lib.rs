//! Marketdeck Core - Portfolio tracking and analytics engine.
//!
//! This crate is the engine behind the Marketdeck dashboard's investment
//! planner:
//!
//! - **Portfolio store**: position management with quantity-accumulating,
//!   last-write-wins merges and write-through persistence
//! - **Analytics**: sector allocation, market-cap distribution, risk/reward
//!   scatter series
//! - **Return metrics**: total-period return and annualized volatility from
//!   daily close prices
//! - **Gateway client**: typed client for the market data API
//!
//! # Example
//!
//! ```rust,no_run
//! use marketdeck_core::portfolio::PortfolioStore;
//! use marketdeck_core::Position;
//!
//! // Open the store over the default portfolio file
//! let mut store = PortfolioStore::open_default();
//!
//! // Add a position (returns (Position, was_merge))
//! let (position, _) = store.add_stock(Position::new("AAPL", 10.0, 150.0))?;
//! println!("Holding {} shares of {}", position.quantity, position.symbol);
//!
//! // Derived views recompute from the current snapshot
//! for bucket in store.sector_allocation() {
//!     println!("{}: {:.2}", bucket.key, bucket.value);
//! }
//! # Ok::<(), marketdeck_core::Error>(())
//! ```

pub mod gateway;
pub mod portfolio;
pub mod returns;
pub mod types;

// Re-export commonly used types
pub use types::{AllocationBucket, ApiResponse, Portfolio, Position, RiskRewardPoint};

// Re-export main functionality
pub use gateway::MarketClient;
pub use portfolio::{PortfolioAnalysis, PortfolioStore};
pub use returns::{annualized_volatility, daily_returns, total_return, ReturnProfile};

/// Error types for marketdeck-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for marketdeck-core operations.
pub type Result<T> = std::result::Result<T, Error>;
