use std::future::Future;
use std::time::Duration;

use common::EngineError;
use common::traits::Strategy;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// What a strategy task did before it stopped.
#[derive(Debug, Default)]
pub struct StrategyReport {
    pub symbol: String,
    pub ticks: u64,
    pub instructions: u64,
    pub failures: u64,
    pub halted: Option<EngineError>,
}

/// Drives each registered strategy on a fixed interval, one task per instrument.
///
/// Ticks of the same strategy never overlap, and a tick that has started always runs to
/// completion before shutdown is observed.
pub struct Scheduler {
    tick_interval: Duration,
    strategies: Vec<Box<dyn Strategy>>,
}

impl Scheduler {
    pub fn new(tick_interval: Duration) -> Self {
        Self {
            tick_interval,
            strategies: Vec::new(),
        }
    }

    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        self.strategies.push(strategy);
    }

    /// Runs until `shutdown` resolves or every strategy has halted.
    pub async fn run<F>(self, shutdown: F) -> Vec<StrategyReport>
    where
        F: Future<Output = ()>,
    {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = JoinSet::new();

        info!(
            "Starting scheduler for {} strategies, ticking every {:?}",
            self.strategies.len(),
            self.tick_interval
        );
        for strategy in self.strategies {
            tasks.spawn(Self::drive(strategy, self.tick_interval, stop_rx.clone()));
        }

        let mut reports = Vec::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    warn!("Shutdown requested, waiting for {} strategies to finish their tick.", tasks.len());
                    let _ = stop_tx.send(true);
                    break;
                }
                joined = tasks.join_next() => {
                    match joined {
                        Some(Ok(report)) => reports.push(report),
                        Some(Err(e)) => error!("Strategy task crashed: {}", e),
                        None => {
                            warn!("All strategies have stopped.");
                            return reports;
                        }
                    }
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => reports.push(report),
                Err(e) => error!("Strategy task crashed: {}", e),
            }
        }
        info!("Scheduler stopped.");
        reports
    }

    async fn drive(
        mut strategy: Box<dyn Strategy>,
        every: Duration,
        mut stop_rx: watch::Receiver<bool>,
    ) -> StrategyReport {
        let mut report = StrategyReport {
            symbol: strategy.symbol().to_string(),
            ..Default::default()
        };
        let mut interval = time::interval(every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = stop_rx.changed() => break,
                _ = interval.tick() => {
                    report.ticks += 1;
                    match strategy.on_tick().await {
                        Ok(instructions) => {
                            report.instructions += instructions.len() as u64;
                            debug!("{}: tick {} emitted {} instructions", report.symbol, report.ticks, instructions.len());
                        }
                        Err(e) if e.is_fatal() => {
                            error!("{}: {}. Halting strategy.", report.symbol, e);
                            report.halted = Some(e);
                            break;
                        }
                        Err(e) => {
                            report.failures += 1;
                            error!("{}: {}", report.symbol, e);
                        }
                    }
                }
            }
        }

        info!(
            "{}: stopped after {} ticks ({} instructions, {} failures)",
            report.symbol, report.ticks, report.instructions, report.failures
        );
        report
    }
}
