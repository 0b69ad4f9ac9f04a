use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::EngineError;

/// Longest news lookback accepted, in days.
pub const MAX_LOOKBACK_DAYS: u32 = 3650;

/// Price multipliers applied to the entry price for the exit legs of a bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketConfig {
    pub long_take_profit: Decimal,
    pub long_stop_loss: Decimal,
    pub short_take_profit: Decimal,
    pub short_stop_loss: Decimal,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            long_take_profit: dec!(1.20),
            long_stop_loss: dec!(0.95),
            short_take_profit: dec!(0.80),
            short_stop_loss: dec!(1.05),
        }
    }
}

impl BracketConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        let one = Decimal::ONE;
        let legs = [
            ("long take-profit", self.long_take_profit, self.long_take_profit > one),
            ("long stop-loss", self.long_stop_loss, self.long_stop_loss < one),
            ("short take-profit", self.short_take_profit, self.short_take_profit < one),
            ("short stop-loss", self.short_stop_loss, self.short_stop_loss > one),
        ];
        for (name, value, on_correct_side) in legs {
            if value <= Decimal::ZERO || !on_correct_side {
                return Err(EngineError::Configuration(format!(
                    "{} multiplier {} is out of range",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyConfig {
    pub symbol: String,
    /// Fraction of available cash sized into each entry, in (0, 1].
    pub cash_at_risk: Decimal,
    /// Signals must be strictly above this probability to be acted on.
    pub confidence_threshold: f64,
    pub lookback_days: u32,
    /// Deadline for each cash / price / news / scoring call within a tick.
    pub collaborator_timeout: Duration,
    pub bracket: BracketConfig,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            symbol: "SPY".to_string(),
            cash_at_risk: dec!(0.5),
            confidence_threshold: 0.999,
            lookback_days: 3,
            collaborator_timeout: Duration::from_secs(30),
            bracket: BracketConfig::default(),
        }
    }
}

impl StrategyConfig {
    /// Reads overrides from the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, EngineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let timeout_secs = parse_or(
            &lookup,
            "COLLABORATOR_TIMEOUT_SECS",
            defaults.collaborator_timeout.as_secs(),
        )?;

        let config = Self {
            symbol: lookup("SYMBOL").unwrap_or(defaults.symbol),
            cash_at_risk: parse_or(&lookup, "CASH_AT_RISK", defaults.cash_at_risk)?,
            confidence_threshold: parse_or(
                &lookup,
                "CONFIDENCE_THRESHOLD",
                defaults.confidence_threshold,
            )?,
            lookback_days: parse_or(&lookup, "LOOKBACK_DAYS", defaults.lookback_days)?,
            collaborator_timeout: Duration::from_secs(timeout_secs),
            bracket: BracketConfig {
                long_take_profit: parse_or(
                    &lookup,
                    "LONG_TAKE_PROFIT",
                    defaults.bracket.long_take_profit,
                )?,
                long_stop_loss: parse_or(&lookup, "LONG_STOP_LOSS", defaults.bracket.long_stop_loss)?,
                short_take_profit: parse_or(
                    &lookup,
                    "SHORT_TAKE_PROFIT",
                    defaults.bracket.short_take_profit,
                )?,
                short_stop_loss: parse_or(
                    &lookup,
                    "SHORT_STOP_LOSS",
                    defaults.bracket.short_stop_loss,
                )?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = symbol.into();
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if self.symbol.trim().is_empty() {
            return Err(EngineError::Configuration("symbol must not be empty".into()));
        }
        if self.cash_at_risk <= Decimal::ZERO || self.cash_at_risk > Decimal::ONE {
            return Err(EngineError::Configuration(format!(
                "cash_at_risk must be in (0, 1], got {}",
                self.cash_at_risk
            )));
        }
        if !(0.0..1.0).contains(&self.confidence_threshold) {
            return Err(EngineError::Configuration(format!(
                "confidence_threshold must be in [0, 1), got {}",
                self.confidence_threshold
            )));
        }
        if self.lookback_days > MAX_LOOKBACK_DAYS {
            return Err(EngineError::Configuration(format!(
                "lookback_days must be at most {}, got {}",
                MAX_LOOKBACK_DAYS, self.lookback_days
            )));
        }
        if self.collaborator_timeout.is_zero() {
            return Err(EngineError::Configuration(
                "collaborator_timeout must be non-zero".into(),
            ));
        }
        self.bracket.validate()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, EngineError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            EngineError::Configuration(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}
