use std::collections::HashSet;
use std::env;
use std::time::Duration;

use anyhow::{Context, bail};

const DEFAULT_TICK_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Host-side settings: which instruments to run and how often to tick them.
#[derive(Debug, Clone, PartialEq)]
pub struct HostConfig {
    pub symbols: Vec<String>,
    pub tick_interval: Duration,
    pub dry_run: bool,
}

impl HostConfig {
    pub fn from_env(default_symbol: &str) -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok(), default_symbol)
    }

    pub fn from_lookup<F>(lookup: F, default_symbol: &str) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_symbols = lookup("TRADER_SYMBOLS").unwrap_or_else(|| default_symbol.to_string());
        let symbols: Vec<String> = raw_symbols
            .split(',')
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        if symbols.is_empty() {
            bail!("TRADER_SYMBOLS does not name any symbol");
        }

        let mut seen = HashSet::new();
        if let Some(dup) = symbols.iter().find(|s| !seen.insert(s.as_str())) {
            bail!("TRADER_SYMBOLS lists {} more than once", dup);
        }

        let tick_secs = match lookup("TICK_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("TICK_INTERVAL_SECS has invalid value '{}'", raw))?,
            None => DEFAULT_TICK_INTERVAL_SECS,
        };
        if tick_secs == 0 {
            bail!("TICK_INTERVAL_SECS must be positive");
        }

        let dry_run = match lookup("DRY_RUN") {
            Some(raw) => parse_flag(&raw).with_context(|| format!("DRY_RUN has invalid value '{}'", raw))?,
            None => false,
        };

        Ok(Self {
            symbols,
            tick_interval: Duration::from_secs(tick_secs),
            dry_run,
        })
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => bail!("expected a boolean, got '{}'", other),
    }
}
