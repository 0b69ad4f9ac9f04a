use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use common::models::{
    DateWindow, Instruction, PortfolioSnapshot, Quote, SentimentSignal, TradeDirection,
};
use common::traits::{AccountSource, Broker, Clock, NewsSource, PriceFeed, SentimentScorer, Strategy};
use common::{EngineError, StrategyConfig};
use tracing::{debug, error, info, warn};

use crate::services::date_window;
use crate::services::order_builder::OrderBuilder;
use crate::services::position_sizer;
use crate::services::position_state::PositionState;
use crate::services::sentiment_gate::SentimentGate;

/// External services one engine instance talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub clock: Arc<dyn Clock>,
    pub account: Arc<dyn AccountSource>,
    pub prices: Arc<dyn PriceFeed>,
    pub news: Arc<dyn NewsSource>,
    pub scorer: Arc<dyn SentimentScorer>,
    pub broker: Arc<dyn Broker>,
}

/// Single-instrument sentiment trader. Owns its direction state; one instance per symbol.
pub struct DecisionEngine {
    config: StrategyConfig,
    state: PositionState,
    gate: SentimentGate,
    builder: OrderBuilder,
    clock: Arc<dyn Clock>,
    account: Arc<dyn AccountSource>,
    prices: Arc<dyn PriceFeed>,
    news: Arc<dyn NewsSource>,
    broker: Arc<dyn Broker>,
}

impl DecisionEngine {
    pub fn new(config: StrategyConfig, collaborators: Collaborators) -> Result<Self, EngineError> {
        config.validate()?;

        let Collaborators {
            clock,
            account,
            prices,
            news,
            scorer,
            broker,
        } = collaborators;

        Ok(Self {
            gate: SentimentGate::new(scorer, config.confidence_threshold),
            builder: OrderBuilder::new(config.bracket.clone()),
            state: PositionState::new(),
            config,
            clock,
            account,
            prices,
            news,
            broker,
        })
    }

    pub fn with_initial_direction(mut self, direction: TradeDirection) -> Self {
        self.state = PositionState::starting_at(direction);
        self
    }

    pub fn direction(&self) -> TradeDirection {
        self.state.direction()
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// One decision cycle: size, gate on sentiment, transition, hand instructions to the broker.
    ///
    /// Missing or late inputs make the tick a no-op. Configuration problems and broker
    /// failures are returned; the direction update is not rolled back on a broker failure.
    pub async fn tick(&mut self) -> Result<Vec<Instruction>, EngineError> {
        let now = self.clock.now();

        let (snapshot, quote) = match self.observe().await {
            Ok(observed) => observed,
            Err(e) => {
                warn!("{}: no action this tick, {}", self.config.symbol, e);
                return Ok(Vec::new());
            }
        };

        let quantity =
            match position_sizer::size(snapshot.cash, quote.price, self.config.cash_at_risk) {
                Ok(quantity) => quantity,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!("{}: no action this tick, {}", quote.symbol, e);
                    return Ok(Vec::new());
                }
            };
        if quantity == 0 || snapshot.cash <= quote.price {
            debug!(
                "{}: not enough cash to trade (cash={} price={} qty={})",
                quote.symbol, snapshot.cash, quote.price, quantity
            );
            return Ok(Vec::new());
        }

        let window = date_window::window(now, self.config.lookback_days)?;
        let signal = match self.read_sentiment(&window).await {
            Ok(signal) => signal,
            Err(e) => {
                warn!("{}: no action this tick, {}", quote.symbol, e);
                return Ok(Vec::new());
            }
        };

        let instructions = self.decide(&quote, quantity, &signal)?;
        self.dispatch(&instructions).await?;
        Ok(instructions)
    }

    /// Gate, transition and order construction for already-gathered inputs.
    fn decide(
        &mut self,
        quote: &Quote,
        quantity: u64,
        signal: &SentimentSignal,
    ) -> Result<Vec<Instruction>, EngineError> {
        let Some(side) = self.gate.interpret(signal).side() else {
            debug!(
                "{}: {} sentiment at {:.4} is not actionable (threshold {})",
                quote.symbol,
                signal.label,
                signal.probability,
                self.gate.threshold()
            );
            return Ok(Vec::new());
        };
        if quantity == 0 {
            return Ok(Vec::new());
        }

        let order = self.builder.build(&quote.symbol, side, quantity, quote.price)?;
        let transition = self.state.enter(side);

        let mut instructions = Vec::with_capacity(2);
        if transition.liquidate_first {
            instructions.push(Instruction::LiquidateAll {
                symbol: quote.symbol.clone(),
            });
        }
        instructions.push(Instruction::Submit(order));

        info!(
            "{}: STRONG {} ({:.4}) at {} -> {:?} => {:?}, {} instruction(s)",
            quote.symbol,
            signal.label,
            signal.probability,
            quote.price,
            transition.from,
            transition.to,
            instructions.len()
        );
        Ok(instructions)
    }

    async fn observe(&self) -> Result<(PortfolioSnapshot, Quote), EngineError> {
        let limit = self.config.collaborator_timeout;
        let symbol = &self.config.symbol;

        let cash = with_deadline(limit, "cash lookup", self.account.cash()).await?;
        let price = with_deadline(limit, "price lookup", self.prices.last_price(symbol)).await?;

        Ok((
            PortfolioSnapshot { cash },
            Quote {
                symbol: symbol.clone(),
                price,
            },
        ))
    }

    async fn read_sentiment(&self, window: &DateWindow) -> Result<SentimentSignal, EngineError> {
        let limit = self.config.collaborator_timeout;
        let symbol = &self.config.symbol;

        let headlines =
            with_deadline(limit, "news lookup", self.news.headlines(symbol, window)).await?;
        debug!(
            "{}: {} headlines from {} to {}",
            symbol,
            headlines.len(),
            window.start,
            window.end
        );

        tokio::time::timeout(limit, self.gate.classify(&headlines))
            .await
            .map_err(|_| {
                EngineError::InsufficientData(format!("sentiment scoring timed out after {:?}", limit))
            })?
    }

    async fn dispatch(&self, instructions: &[Instruction]) -> Result<(), EngineError> {
        for instruction in instructions {
            let result = match instruction {
                Instruction::LiquidateAll { symbol } => self.broker.liquidate_all(symbol).await,
                Instruction::Submit(order) => self.broker.submit_order(order).await,
            };

            if let Err(e) = result {
                error!("{}: {} failed: {}", self.config.symbol, instruction, e);
                return Err(EngineError::Submission {
                    symbol: self.config.symbol.clone(),
                    reason: format!("{}: {}", instruction, e),
                });
            }
            info!("{}: sent {}", self.config.symbol, instruction);
        }
        Ok(())
    }
}

async fn with_deadline<T, E, F>(limit: Duration, what: &str, call: F) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(EngineError::InsufficientData(format!("{} failed: {}", what, e))),
        Err(_) => Err(EngineError::InsufficientData(format!(
            "{} timed out after {:?}",
            what, limit
        ))),
    }
}

#[async_trait]
impl Strategy for DecisionEngine {
    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    async fn on_tick(&mut self) -> Result<Vec<Instruction>, EngineError> {
        self.tick().await
    }
}
