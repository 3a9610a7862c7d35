//! HTTP client for the market data API.

use reqwest::Client;
use serde::de::DeserializeOwned;

use super::types::{HistoricalBar, StockDetails, StockList};
use crate::returns::ReturnProfile;
use crate::types::Position;
use crate::{Error, Result};

/// Client for the quote/history gateway.
///
/// A thin typed wrapper over the dashboard backend. Failures surface as
/// errors to the caller; nothing here touches the portfolio store.
#[derive(Debug, Clone)]
pub struct MarketClient {
    base_url: String,
    client: Client,
}

impl MarketClient {
    /// Create a new client with the given base URL.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make a GET request and decode the JSON body.
    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "gateway request");

        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.json().await?)
    }

    /// Symbols available in the stock universe.
    pub async fn stock_list(&self) -> Result<Vec<String>> {
        let list: StockList = self.get("/api/stocks").await?;
        Ok(list.stocks)
    }

    /// Current details for one symbol.
    pub async fn details(&self, symbol: &str) -> Result<StockDetails> {
        self.get(&format!("/api/stock/{symbol}")).await
    }

    /// Daily bars for a symbol over a period such as `"1y"`.
    pub async fn history(&self, symbol: &str, period: &str) -> Result<Vec<HistoricalBar>> {
        self.get(&format!("/api/stock/{symbol}/history?period={period}"))
            .await
    }

    /// Assemble a portfolio position for `quantity` shares of `symbol`.
    ///
    /// Fetches details and one year of history, derives the return
    /// profile, and packages a position valued at the current price. An
    /// empty history yields a zero profile; a failed fetch is an error.
    pub async fn build_position(&self, symbol: &str, quantity: f64) -> Result<Position> {
        let details = self.details(symbol).await?;
        let history = self.history(symbol, "1y").await?;
        Ok(assemble_position(&details, &history, quantity))
    }
}

/// Package gateway data into a position.
///
/// Missing classification falls back to "Unknown"; the display name drops
/// the exchange suffix the backend appends to NSE symbols.
pub fn assemble_position(
    details: &StockDetails,
    history: &[HistoricalBar],
    quantity: f64,
) -> Position {
    let closes: Vec<f64> = history.iter().map(|bar| bar.close).collect();
    let profile = ReturnProfile::from_closes(&closes);

    let mut position = Position::new(&details.symbol, quantity, details.current_price)
        .with_classification(
            details.sector.as_deref().unwrap_or("Unknown"),
            details.market_cap.unwrap_or(0.0),
            details.market_cap_category.as_deref().unwrap_or("Unknown"),
        )
        .with_profile(profile.one_year_return, profile.volatility);

    position.name = details
        .symbol
        .strip_suffix(".NS")
        .unwrap_or(&details.symbol)
        .to_string();

    position
}
