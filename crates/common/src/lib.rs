pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod traits;

pub use config::{BracketConfig, StrategyConfig};
pub use error::EngineError;
