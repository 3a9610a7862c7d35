//! Quote/history gateway: typed client for the market data API.

mod client;
mod types;

pub use client::{assemble_position, MarketClient};
pub use types::{HistoricalBar, StockDetails, StockList};
