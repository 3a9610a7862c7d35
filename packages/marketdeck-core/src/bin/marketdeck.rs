//! Marketdeck CLI - portfolio and analytics operations with JSON output.

use clap::{Parser, Subcommand};
use marketdeck_core::{
    gateway::MarketClient,
    portfolio::{PortfolioAnalysis, PortfolioStore},
    ApiResponse, Position,
};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "marketdeck")]
#[command(about = "Marketdeck CLI - portfolio tracking and analytics")]
#[command(version)]
struct Cli {
    /// Base URL of the market data API (defaults to $MARKETDECK_API_URL)
    #[arg(long)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Portfolio management commands
    Portfolio {
        #[command(subcommand)]
        action: PortfolioAction,
    },
    /// Derived analytics views
    Analytics {
        #[command(subcommand)]
        action: AnalyticsAction,
    },
    /// List symbols available from the market data API
    Stocks,
}

#[derive(Subcommand)]
enum PortfolioAction {
    /// Get portfolio status
    Status,
    /// List all positions
    Positions,
    /// Add a position (fetches details and history unless --price is given)
    Add {
        /// Stock symbol
        #[arg(short, long)]
        symbol: String,
        /// Number of shares
        #[arg(short = 'n', long)]
        quantity: f64,
        /// Reference price; skips the API fetch when provided
        #[arg(short, long)]
        price: Option<f64>,
        /// Sector classification for offline adds
        #[arg(long)]
        sector: Option<String>,
        /// Market-cap category for offline adds
        #[arg(long)]
        cap: Option<String>,
    },
    /// Remove a position
    Remove {
        /// Stock symbol
        #[arg(short, long)]
        symbol: String,
    },
    /// Replace the quantity of a position
    SetQuantity {
        /// Stock symbol
        #[arg(short, long)]
        symbol: String,
        /// New share count
        #[arg(short = 'n', long)]
        quantity: f64,
    },
    /// Discard all positions
    Clear,
}

#[derive(Subcommand)]
enum AnalyticsAction {
    /// Sector allocation buckets
    Sectors,
    /// Market-cap distribution buckets
    Caps,
    /// Risk/reward scatter series
    RiskReward,
    /// Everything in one payload
    Full,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let api = cli
        .api
        .or_else(|| std::env::var("MARKETDECK_API_URL").ok())
        .unwrap_or_else(|| "http://localhost:8000".to_string());

    let output = match cli.command {
        Commands::Portfolio { action } => handle_portfolio(action, &api).await,
        Commands::Analytics { action } => handle_analytics(action),
        Commands::Stocks => handle_stocks(&api).await,
    };

    println!("{}", output);
}

async fn handle_portfolio(action: PortfolioAction, api: &str) -> String {
    let mut store = PortfolioStore::open_default();

    match action {
        PortfolioAction::Status => {
            let portfolio = store.portfolio();
            serde_json::to_string_pretty(&ApiResponse::ok(json!({
                "positions": portfolio.positions,
                "position_count": portfolio.position_count(),
                "total_value": portfolio.total_value,
                "updated_at": portfolio.updated_at,
            })))
            .unwrap()
        }
        PortfolioAction::Positions => serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "positions": store.positions(),
        })))
        .unwrap(),
        PortfolioAction::Add {
            symbol,
            quantity,
            price,
            sector,
            cap,
        } => {
            let incoming = match price {
                Some(price) => Position::new(&symbol, quantity, price).with_classification(
                    sector.as_deref().unwrap_or("Unknown"),
                    0.0,
                    cap.as_deref().unwrap_or("Unknown"),
                ),
                None => {
                    let client = MarketClient::new(api);
                    match client.build_position(&symbol, quantity).await {
                        Ok(position) => position,
                        Err(e) => {
                            return serde_json::to_string_pretty(&ApiResponse::<()>::err(
                                e.to_string(),
                            ))
                            .unwrap()
                        }
                    }
                }
            };

            match store.add_stock(incoming) {
                Ok((position, merged)) => {
                    serde_json::to_string_pretty(&ApiResponse::ok(json!({
                        "position": position,
                        "action": if merged { "merged" } else { "added" },
                        "total_value": store.total_value(),
                    })))
                    .unwrap()
                }
                Err(e) => {
                    serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())).unwrap()
                }
            }
        }
        PortfolioAction::Remove { symbol } => match store.remove_stock(&symbol) {
            Ok(removed) => serde_json::to_string_pretty(&ApiResponse::ok(json!({
                "removed": removed,
                "total_value": store.total_value(),
            })))
            .unwrap(),
            Err(e) => serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())).unwrap(),
        },
        PortfolioAction::SetQuantity { symbol, quantity } => {
            match store.update_quantity(&symbol, quantity) {
                Ok(updated) => serde_json::to_string_pretty(&ApiResponse::ok(json!({
                    "position": updated,
                    "total_value": store.total_value(),
                })))
                .unwrap(),
                Err(e) => {
                    serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())).unwrap()
                }
            }
        }
        PortfolioAction::Clear => match store.clear() {
            Ok(()) => serde_json::to_string_pretty(&ApiResponse::ok(json!({
                "cleared": true,
            })))
            .unwrap(),
            Err(e) => serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())).unwrap(),
        },
    }
}

fn handle_analytics(action: AnalyticsAction) -> String {
    let store = PortfolioStore::open_default();

    match action {
        AnalyticsAction::Sectors => serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "sectors": store.sector_allocation(),
        })))
        .unwrap(),
        AnalyticsAction::Caps => serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "market_caps": store.market_cap_distribution(),
        })))
        .unwrap(),
        AnalyticsAction::RiskReward => serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "risk_reward": store.risk_reward_series(),
        })))
        .unwrap(),
        AnalyticsAction::Full => serde_json::to_string_pretty(&ApiResponse::ok(
            PortfolioAnalysis::from_portfolio(store.portfolio()),
        ))
        .unwrap(),
    }
}

async fn handle_stocks(api: &str) -> String {
    let client = MarketClient::new(api);
    match client.stock_list().await {
        Ok(stocks) => serde_json::to_string_pretty(&ApiResponse::ok(json!({
            "stocks": stocks,
        })))
        .unwrap(),
        Err(e) => serde_json::to_string_pretty(&ApiResponse::<()>::err(e.to_string())).unwrap(),
    }
}
