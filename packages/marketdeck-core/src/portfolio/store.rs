//! Portfolio state: the canonical position collection and its persistence.
//!
//! The store is the single source of truth for the portfolio. Every
//! mutation validates its input, applies the merge rule, recomputes the
//! total value and writes through to the storage backend in one step, so
//! no reader ever observes a stale total.

use crate::types::{AllocationBucket, Portfolio, Position, RiskRewardPoint};
use crate::{portfolio::analytics, Error, Result};
use chrono::Utc;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Persistence backend for the portfolio record.
///
/// Implementations own the storage medium; the store owns the state and
/// the rules. `load` returns `Ok(None)` when no record exists yet.
pub trait Storage: std::fmt::Debug + Send {
    fn load(&self) -> Result<Option<Portfolio>>;
    fn save(&self, portfolio: &Portfolio) -> Result<()>;
}

/// JSON-file storage under a fixed path.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a file backend at the given path.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default portfolio file path.
    ///
    /// `~/.marketdeck/portfolio.json`, overridable with the
    /// `MARKETDECK_PORTFOLIO_FILE` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var("MARKETDECK_PORTFOLIO_FILE") {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".marketdeck/portfolio.json"))
            .unwrap_or_else(|| PathBuf::from("portfolio.json"))
    }

    /// Path this backend reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<Portfolio>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        let data: serde_json::Value = serde_json::from_str(&content)?;

        // Legacy layout: a bare list of positions with no envelope.
        if data.is_array() {
            let positions: Vec<Position> = serde_json::from_value(data)?;
            return Ok(Some(Portfolio {
                positions,
                ..Default::default()
            }));
        }

        Ok(Some(serde_json::from_value(data)?))
    }

    fn save(&self, portfolio: &Portfolio) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(portfolio)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

/// No-op storage for ephemeral stores and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage;

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Portfolio>> {
        Ok(None)
    }

    fn save(&self, _portfolio: &Portfolio) -> Result<()> {
        Ok(())
    }
}

/// The portfolio store: canonical state plus mutation and read surface.
#[derive(Debug)]
pub struct PortfolioStore {
    storage: Box<dyn Storage>,
    portfolio: Portfolio,
}

impl PortfolioStore {
    /// Create a store over the given backend, loading any persisted state.
    ///
    /// Malformed persisted data is treated as an empty portfolio rather
    /// than an error; the application must never fail to start over a bad
    /// record. The total value is always recomputed, never read from disk.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        let mut portfolio = match storage.load() {
            Ok(Some(portfolio)) => portfolio,
            Ok(None) => Portfolio::default(),
            Err(e) => {
                tracing::warn!("discarding malformed portfolio record: {e}");
                Portfolio::default()
            }
        };
        portfolio.total_value = portfolio.computed_total();

        Self { storage, portfolio }
    }

    /// Store backed by the default portfolio file.
    pub fn open_default() -> Self {
        Self::with_path(JsonFileStorage::default_path())
    }

    /// Store backed by a JSON file at a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self::new(Box::new(JsonFileStorage::new(path)))
    }

    /// Ephemeral store with no persistence.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage))
    }

    /// Current portfolio snapshot.
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// All positions in display order.
    pub fn positions(&self) -> &[Position] {
        &self.portfolio.positions
    }

    /// Find a position by exact symbol.
    pub fn find(&self, symbol: &str) -> Option<&Position> {
        self.portfolio.find(symbol)
    }

    /// Total portfolio value.
    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value
    }

    /// Add a position, merging into an existing holding of the same symbol.
    ///
    /// On a merge the quantity accumulates while every other field comes
    /// from the incoming position: re-adding a symbol refreshes its
    /// valuation and classification to the latest fetch. The stored
    /// `reference_price` therefore reflects only the most recent addition,
    /// not an average cost basis.
    ///
    /// Returns the stored position and whether an existing one was merged.
    pub fn add_stock(&mut self, incoming: Position) -> Result<(Position, bool)> {
        if incoming.symbol.is_empty() {
            return Err(Error::InvalidInput("symbol must not be empty".to_string()));
        }
        if incoming.quantity <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "quantity must be positive, got {}",
                incoming.quantity
            )));
        }
        if incoming.reference_price < 0.0 {
            return Err(Error::InvalidInput(format!(
                "reference price must not be negative, got {}",
                incoming.reference_price
            )));
        }

        let existing = self
            .portfolio
            .positions
            .iter()
            .position(|p| p.symbol == incoming.symbol);

        let (idx, merged) = match existing {
            Some(idx) => {
                let accumulated = self.portfolio.positions[idx].quantity + incoming.quantity;
                self.portfolio.positions[idx] = Position {
                    quantity: accumulated,
                    ..incoming
                };
                (idx, true)
            }
            None => {
                self.portfolio.positions.push(incoming);
                (self.portfolio.positions.len() - 1, false)
            }
        };

        self.commit()?;
        Ok((self.portfolio.positions[idx].clone(), merged))
    }

    /// Remove a position. An absent symbol is a no-op, not an error.
    pub fn remove_stock(&mut self, symbol: &str) -> Result<Option<Position>> {
        let Some(idx) = self
            .portfolio
            .positions
            .iter()
            .position(|p| p.symbol == symbol)
        else {
            return Ok(None);
        };

        let removed = self.portfolio.positions.remove(idx);
        self.commit()?;
        Ok(Some(removed))
    }

    /// Replace the quantity of an existing position.
    ///
    /// A non-positive quantity is rejected; an absent symbol is a no-op.
    pub fn update_quantity(&mut self, symbol: &str, quantity: f64) -> Result<Option<Position>> {
        if quantity <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "quantity must be positive, got {quantity}"
            )));
        }

        let Some(pos) = self
            .portfolio
            .positions
            .iter_mut()
            .find(|p| p.symbol == symbol)
        else {
            return Ok(None);
        };

        pos.quantity = quantity;
        let updated = pos.clone();
        self.commit()?;
        Ok(Some(updated))
    }

    /// Discard all positions.
    pub fn clear(&mut self) -> Result<()> {
        self.portfolio.positions.clear();
        self.commit()
    }

    /// Position value summed per sector.
    pub fn sector_allocation(&self) -> Vec<AllocationBucket> {
        analytics::sector_allocation(&self.portfolio)
    }

    /// Position value summed per market-cap category.
    pub fn market_cap_distribution(&self) -> Vec<AllocationBucket> {
        analytics::market_cap_distribution(&self.portfolio)
    }

    /// One risk/reward scatter point per position.
    pub fn risk_reward_series(&self) -> Vec<RiskRewardPoint> {
        analytics::risk_reward_series(&self.portfolio)
    }

    /// Recompute the derived total, stamp, and write through.
    fn commit(&mut self) -> Result<()> {
        self.portfolio.total_value = self.portfolio.computed_total();

        if self.portfolio.created_at.is_none() {
            self.portfolio.created_at = Some(Utc::now());
        }
        self.portfolio.updated_at = Some(Utc::now());

        self.storage.save(&self.portfolio)?;
        tracing::debug!(
            positions = self.portfolio.position_count(),
            total_value = self.portfolio.total_value,
            "portfolio saved"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_add_new_position() {
        let mut store = PortfolioStore::in_memory();
        let (position, merged) = store.add_stock(Position::new("AAPL", 10.0, 150.0)).unwrap();

        assert!(!merged);
        assert_eq!(position.symbol, "AAPL");
        assert_eq!(position.quantity, 10.0);
        assert_eq!(store.positions().len(), 1);
        assert_eq!(store.total_value(), 1500.0);
    }

    #[test]
    fn test_add_distinct_symbols() {
        let mut store = PortfolioStore::in_memory();
        store.add_stock(Position::new("AAPL", 10.0, 150.0)).unwrap();
        store.add_stock(Position::new("GOOGL", 5.0, 100.0)).unwrap();

        assert_eq!(store.positions().len(), 2);
        // total tracks sum of quantity * reference_price
        assert_eq!(store.total_value(), 2000.0);
        // insertion order is display order
        assert_eq!(store.positions()[0].symbol, "AAPL");
        assert_eq!(store.positions()[1].symbol, "GOOGL");
    }

    #[test]
    fn test_readd_accumulates_quantity_refreshes_metadata() {
        let mut store = PortfolioStore::in_memory();
        store
            .add_stock(
                Position::new("AAPL", 10.0, 150.0)
                    .with_classification("Tech", 2.0e12, "Large Cap")
                    .with_profile(8.0, 20.0),
            )
            .unwrap();

        let (position, merged) = store
            .add_stock(
                Position::new("AAPL", 5.0, 170.0)
                    .with_classification("Technology", 2.5e12, "Large Cap")
                    .with_profile(12.0, 25.0),
            )
            .unwrap();

        assert!(merged);
        assert_eq!(store.positions().len(), 1);
        // quantity accumulates
        assert_eq!(position.quantity, 15.0);
        // every other field is last-write-wins, not averaged
        assert_eq!(position.reference_price, 170.0);
        assert_eq!(position.sector, "Technology");
        assert_eq!(position.one_year_return, 12.0);
        assert_eq!(position.volatility, 25.0);
        assert_eq!(store.total_value(), 15.0 * 170.0);
    }

    #[test]
    fn test_add_symbol_case_sensitive() {
        let mut store = PortfolioStore::in_memory();
        store.add_stock(Position::new("aapl", 1.0, 100.0)).unwrap();
        store.add_stock(Position::new("AAPL", 1.0, 100.0)).unwrap();

        assert_eq!(store.positions().len(), 2);
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut store = PortfolioStore::in_memory();

        let result = store.add_stock(Position::new("AAPL", 0.0, 150.0));
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = store.add_stock(Position::new("AAPL", -3.0, 150.0));
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        assert!(store.portfolio().is_empty());
        assert_eq!(store.total_value(), 0.0);
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut store = PortfolioStore::in_memory();
        let result = store.add_stock(Position::new("AAPL", 1.0, -0.01));
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_remove_stock() {
        let mut store = PortfolioStore::in_memory();
        store.add_stock(Position::new("AAPL", 10.0, 150.0)).unwrap();
        store.add_stock(Position::new("GOOGL", 5.0, 100.0)).unwrap();

        let removed = store.remove_stock("AAPL").unwrap();
        assert_eq!(removed.unwrap().symbol, "AAPL");
        assert_eq!(store.positions().len(), 1);
        assert_eq!(store.total_value(), 500.0);
    }

    #[test]
    fn test_remove_absent_symbol_is_noop() {
        let mut store = PortfolioStore::in_memory();
        store.add_stock(Position::new("AAPL", 10.0, 150.0)).unwrap();

        let before = store.portfolio().clone();
        let removed = store.remove_stock("MSFT").unwrap();

        assert!(removed.is_none());
        assert_eq!(store.portfolio(), &before);
    }

    #[test]
    fn test_update_quantity() {
        let mut store = PortfolioStore::in_memory();
        store.add_stock(Position::new("AAPL", 10.0, 150.0)).unwrap();

        let updated = store.update_quantity("AAPL", 4.0).unwrap().unwrap();
        assert_eq!(updated.quantity, 4.0);
        // price untouched by a quantity update
        assert_eq!(updated.reference_price, 150.0);
        assert_eq!(store.total_value(), 600.0);
    }

    #[test]
    fn test_update_quantity_absent_symbol_is_noop() {
        let mut store = PortfolioStore::in_memory();
        let updated = store.update_quantity("AAPL", 4.0).unwrap();
        assert!(updated.is_none());
    }

    #[test]
    fn test_update_quantity_rejects_non_positive() {
        let mut store = PortfolioStore::in_memory();
        store.add_stock(Position::new("AAPL", 10.0, 150.0)).unwrap();

        let result = store.update_quantity("AAPL", 0.0);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
        assert_eq!(store.find("AAPL").unwrap().quantity, 10.0);
    }

    #[test]
    fn test_clear_then_add() {
        let mut store = PortfolioStore::in_memory();
        store.add_stock(Position::new("AAPL", 10.0, 150.0)).unwrap();
        store.add_stock(Position::new("GOOGL", 5.0, 100.0)).unwrap();

        store.clear().unwrap();
        assert!(store.portfolio().is_empty());
        assert_eq!(store.total_value(), 0.0);

        store.add_stock(Position::new("MSFT", 2.0, 300.0)).unwrap();
        assert_eq!(store.positions().len(), 1);
        assert_eq!(store.total_value(), 600.0);
    }

    #[test]
    fn test_persistence_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");

        let original = {
            let mut store = PortfolioStore::with_path(path.clone());
            store
                .add_stock(
                    Position::new("AAPL", 10.0, 150.0)
                        .with_classification("Tech", 2.0e12, "Large Cap")
                        .with_profile(8.0, 20.0),
                )
                .unwrap();
            store.add_stock(Position::new("HDFC.NS", 3.0, 1600.0)).unwrap();
            store.portfolio().clone()
        };

        let reloaded = PortfolioStore::with_path(path);
        assert_eq!(reloaded.portfolio(), &original);
    }

    #[test]
    fn test_malformed_record_loads_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = PortfolioStore::with_path(path);
        assert!(store.portfolio().is_empty());
        assert_eq!(store.total_value(), 0.0);
    }

    #[test]
    fn test_legacy_bare_array_layout() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(
            &path,
            r#"[{"symbol":"AAPL","quantity":2,"reference_price":100.0}]"#,
        )
        .unwrap();

        let store = PortfolioStore::with_path(path);
        assert_eq!(store.positions().len(), 1);
        // total is recomputed on load, never trusted from disk
        assert_eq!(store.total_value(), 200.0);
    }

    #[test]
    fn test_stale_total_on_disk_is_recomputed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        std::fs::write(
            &path,
            r#"{"positions":[{"symbol":"AAPL","quantity":2,"reference_price":100.0}],"total_value":999999.0}"#,
        )
        .unwrap();

        let store = PortfolioStore::with_path(path);
        assert_eq!(store.total_value(), 200.0);
    }
}
