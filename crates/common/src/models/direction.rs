use serde::{Deserialize, Serialize};

use crate::models::Side;

/// Last directional action committed by an engine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeDirection {
    #[default]
    None,
    Long,
    Short,
}

impl TradeDirection {
    /// Direction an entry on `side` leaves the engine in.
    pub fn after_entry(side: Side) -> Self {
        match side {
            Side::Buy => Self::Long,
            Side::Sell => Self::Short,
        }
    }

    /// Whether entering on `side` reverses the current direction.
    pub fn is_opposite_of(self, side: Side) -> bool {
        matches!(
            (self, side),
            (Self::Long, Side::Sell) | (Self::Short, Side::Buy)
        )
    }
}
