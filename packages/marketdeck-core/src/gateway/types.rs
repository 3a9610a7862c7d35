//! Wire types for the market data API.

use serde::{Deserialize, Serialize};

/// Response envelope for the stock universe listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockList {
    pub stocks: Vec<String>,
}

/// Current details for one symbol.
///
/// The API omits classification fields for instruments it cannot
/// categorize, so everything beyond symbol and price is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockDetails {
    pub symbol: String,
    pub current_price: f64,
    #[serde(default)]
    pub previous_close: Option<f64>,
    #[serde(default)]
    pub day_high: Option<f64>,
    #[serde(default)]
    pub day_low: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub market_cap_category: Option<String>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

/// One daily OHLCV bar.
///
/// The history endpoint serializes field names capitalized (`Date`,
/// `Close`, ...); only date and close are guaranteed present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalBar {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Open", default)]
    pub open: Option<f64>,
    #[serde(rename = "High", default)]
    pub high: Option<f64>,
    #[serde(rename = "Low", default)]
    pub low: Option<f64>,
    #[serde(rename = "Close")]
    pub close: f64,
    #[serde(rename = "Volume", default)]
    pub volume: Option<f64>,
}
