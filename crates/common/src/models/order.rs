use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    #[default]
    Bracket,
}

/// Entry order with its take-profit and stop-loss legs.
/// Built fresh per trade and discarded once handed to the broker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub quantity: u64,
    pub side: Side,
    pub order_class: OrderClass,
    pub take_profit_price: Decimal,
    pub stop_loss_price: Decimal,
}

/// What a tick asks the execution side to do, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    LiquidateAll { symbol: String },
    Submit(OrderIntent),
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiquidateAll { symbol } => write!(f, "LIQUIDATE_ALL {}", symbol),
            Self::Submit(o) => write!(
                f,
                "{} {} x{} bracket TP={} SL={}",
                o.side.to_string().to_uppercase(),
                o.symbol,
                o.quantity,
                o.take_profit_price,
                o.stop_loss_price
            ),
        }
    }
}
