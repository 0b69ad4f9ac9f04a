use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{debug, error, info, warn};

use common::StrategyConfig;
use common::logger;
use common::traits::Broker;
use market_data::remote::{AlpacaClient, SentimentClient};
use strategy::{Collaborators, DecisionEngine};

use crate::actors::scheduler::Scheduler;
use crate::config::HostConfig;
use crate::services::dry_run_broker::DryRunBroker;
use crate::services::system_clock::SystemClock;

mod actors;
mod config;
mod services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logger::setup_logger();
    debug!("System starting up...");

    let strategy_config = StrategyConfig::from_env()?;
    let host = HostConfig::from_env(&strategy_config.symbol)?;

    let alpaca = Arc::new(AlpacaClient::from_env()?);
    let scorer = Arc::new(SentimentClient::from_env()?);

    let dry_run = host.dry_run.then(|| Arc::new(DryRunBroker::new()));
    let broker: Arc<dyn Broker> = match &dry_run {
        Some(dry) => {
            warn!("DRY_RUN enabled: instructions are logged, not sent to the broker.");
            dry.clone()
        }
        None => alpaca.clone(),
    };

    let collaborators = Collaborators {
        clock: Arc::new(SystemClock),
        account: alpaca.clone(),
        prices: alpaca.clone(),
        news: alpaca.clone(),
        scorer,
        broker,
    };

    let mut scheduler = Scheduler::new(host.tick_interval);
    for symbol in &host.symbols {
        let config = strategy_config.clone().with_symbol(symbol.clone());
        info!(
            "Registering {} (cash_at_risk={}, threshold={}, lookback={}d)",
            symbol, config.cash_at_risk, config.confidence_threshold, config.lookback_days
        );
        let engine = DecisionEngine::new(config, collaborators.clone())?;
        scheduler.register(Box::new(engine));
    }

    let reports = scheduler.run(shutdown_signal()).await;
    for report in &reports {
        if let Some(reason) = &report.halted {
            error!("{} halted: {}", report.symbol, reason);
        }
    }

    if let Some(dry) = dry_run {
        info!("DRY RUN recorded {} instructions.", dry.sent().await.len());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
