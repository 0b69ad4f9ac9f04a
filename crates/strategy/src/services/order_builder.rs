use common::models::{OrderClass, OrderIntent, Side};
use common::{BracketConfig, EngineError};
use rust_decimal::Decimal;

/// Builds bracket entries from the current price. Knows nothing about cash or position.
#[derive(Debug, Clone, Default)]
pub struct OrderBuilder {
    bracket: BracketConfig,
}

impl OrderBuilder {
    pub fn new(bracket: BracketConfig) -> Self {
        Self { bracket }
    }

    pub fn build(
        &self,
        symbol: &str,
        side: Side,
        quantity: u64,
        price: Decimal,
    ) -> Result<OrderIntent, EngineError> {
        if quantity == 0 {
            return Err(EngineError::Configuration(format!(
                "refusing to build a zero-quantity {} order for {}",
                side, symbol
            )));
        }
        if price <= Decimal::ZERO {
            return Err(EngineError::Configuration(format!(
                "refusing to build a {} order for {} at non-positive price {}",
                side, symbol, price
            )));
        }

        let (take_profit, stop_loss) = match side {
            Side::Buy => (self.bracket.long_take_profit, self.bracket.long_stop_loss),
            Side::Sell => (self.bracket.short_take_profit, self.bracket.short_stop_loss),
        };

        Ok(OrderIntent {
            symbol: symbol.to_string(),
            quantity,
            side,
            order_class: OrderClass::Bracket,
            take_profit_price: price * take_profit,
            stop_loss_price: price * stop_loss,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_buy_bracket_at_100() {
        let order = OrderBuilder::default()
            .build("SPY", Side::Buy, 10, dec!(100))
            .unwrap();
        assert_eq!(order.take_profit_price, dec!(120.0));
        assert_eq!(order.stop_loss_price, dec!(95.0));
        assert_eq!(order.order_class, OrderClass::Bracket);
    }

    #[test]
    fn test_sell_bracket_at_100() {
        let order = OrderBuilder::default()
            .build("SPY", Side::Sell, 10, dec!(100))
            .unwrap();
        assert_eq!(order.take_profit_price, dec!(80.0));
        assert_eq!(order.stop_loss_price, dec!(105.0));
        assert_eq!(order.side, Side::Sell);
    }

    #[test]
    fn test_buy_bracket_at_50() {
        let order = OrderBuilder::default()
            .build("SPY", Side::Buy, 100, dec!(50))
            .unwrap();
        assert_eq!(order.take_profit_price, dec!(60.0));
        assert_eq!(order.stop_loss_price, dec!(47.5));
        assert_eq!(order.quantity, 100);
        assert_eq!(order.symbol, "SPY");
    }

    #[test]
    fn test_custom_multipliers() {
        let builder = OrderBuilder::new(BracketConfig {
            long_take_profit: dec!(1.10),
            long_stop_loss: dec!(0.90),
            ..BracketConfig::default()
        });
        let order = builder.build("QQQ", Side::Buy, 1, dec!(200)).unwrap();
        assert_eq!(order.take_profit_price, dec!(220));
        assert_eq!(order.stop_loss_price, dec!(180));
    }

    #[test]
    fn test_rejects_zero_quantity_and_bad_price() {
        let builder = OrderBuilder::default();
        assert!(builder.build("SPY", Side::Buy, 0, dec!(100)).is_err());
        assert!(builder.build("SPY", Side::Sell, 5, Decimal::ZERO).is_err());
        assert!(builder.build("SPY", Side::Sell, 5, dec!(-3)).is_err());
    }
}
