use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Invalid strategy parameters or a non-positive price reaching sizing/order building.
    #[error("Configuration Error: {0}")]
    Configuration(String),
    /// Tick inputs could not be gathered or classified. Never escapes a tick.
    #[error("Insufficient Data: {0}")]
    InsufficientData(String),
    #[error("Submission Failed ({symbol}): {reason}")]
    Submission { symbol: String, reason: String },
}

impl EngineError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}
