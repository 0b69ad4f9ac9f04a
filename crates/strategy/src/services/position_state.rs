use common::models::{Side, TradeDirection};

/// Tracks the last committed direction of one engine instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionState {
    direction: TradeDirection,
}

/// Outcome of committing an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: TradeDirection,
    pub to: TradeDirection,
    /// The prior opposite position has to be flattened before the new entry.
    pub liquidate_first: bool,
}

impl PositionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(direction: TradeDirection) -> Self {
        Self { direction }
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    /// Commits an entry on `side`. Same-direction repeats are plain re-entries.
    pub fn enter(&mut self, side: Side) -> Transition {
        let from = self.direction;
        let to = TradeDirection::after_entry(side);
        self.direction = to;
        Transition {
            from,
            to,
            liquidate_first: from.is_opposite_of(side),
        }
    }
}
