//! Narrow interfaces the decision core talks to. Live adapters, dry-run stand-ins
//! and test mocks all plug in here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
#[cfg(any(test, feature = "mocks"))]
use mockall::automock;
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::models::{DateWindow, Instruction, OrderIntent};

/// Engine clock. Live hosts hand out wall-clock time, replay hosts the simulated time.
#[cfg_attr(any(test, feature = "mocks"), automock)]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait AccountSource: Send + Sync {
    async fn cash(&self) -> anyhow::Result<Decimal>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn last_price(&self, symbol: &str) -> anyhow::Result<Decimal>;
}

#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn headlines(&self, symbol: &str, window: &DateWindow) -> anyhow::Result<Vec<String>>;
}

/// External classifier. Returns the raw `(probability, label)` pair for a batch of
/// headlines; an empty batch is passed through as-is.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait SentimentScorer: Send + Sync {
    async fn score(&self, headlines: &[String]) -> anyhow::Result<(f64, String)>;
}

/// Fire-and-forget execution side. Fills, partial fills and retries are its problem.
#[cfg_attr(any(test, feature = "mocks"), automock)]
#[async_trait]
pub trait Broker: Send + Sync {
    async fn submit_order(&self, order: &OrderIntent) -> anyhow::Result<()>;

    async fn liquidate_all(&self, symbol: &str) -> anyhow::Result<()>;
}

/// The tick capability a host scheduler drives.
#[async_trait]
pub trait Strategy: Send {
    fn symbol(&self) -> &str;

    /// Runs one decision cycle and returns the instructions that were handed to the broker.
    async fn on_tick(&mut self) -> Result<Vec<Instruction>, EngineError>;
}
