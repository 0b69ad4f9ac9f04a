use async_trait::async_trait;
use common::models::{Instruction, OrderIntent};
use common::traits::Broker;
use tokio::sync::Mutex;
use tracing::info;

/// Broker stand-in that only logs and records what it was asked to do.
#[derive(Default)]
pub struct DryRunBroker {
    sent: Mutex<Vec<Instruction>>,
}

impl DryRunBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Instruction> {
        self.sent.lock().await.clone()
    }

    async fn record(&self, instruction: Instruction) {
        info!("DRY RUN: {}", instruction);
        self.sent.lock().await.push(instruction);
    }
}

#[async_trait]
impl Broker for DryRunBroker {
    async fn submit_order(&self, order: &OrderIntent) -> anyhow::Result<()> {
        self.record(Instruction::Submit(order.clone())).await;
        Ok(())
    }

    async fn liquidate_all(&self, symbol: &str) -> anyhow::Result<()> {
        self.record(Instruction::LiquidateAll {
            symbol: symbol.to_string(),
        })
        .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::models::{OrderClass, Side};
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn test_records_instructions_in_order() {
        let broker = DryRunBroker::new();
        let order = OrderIntent {
            symbol: "SPY".to_string(),
            quantity: 100,
            side: Side::Buy,
            order_class: OrderClass::Bracket,
            take_profit_price: dec!(60.0),
            stop_loss_price: dec!(47.5),
        };

        broker.liquidate_all("SPY").await.unwrap();
        broker.submit_order(&order).await.unwrap();

        assert_eq!(
            broker.sent().await,
            vec![
                Instruction::LiquidateAll {
                    symbol: "SPY".to_string()
                },
                Instruction::Submit(order),
            ]
        );
    }
}
