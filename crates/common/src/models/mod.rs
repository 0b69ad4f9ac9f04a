pub mod direction;
pub mod order;
pub mod quote;
pub mod sentiment;
pub mod window;

pub use direction::TradeDirection;
pub use order::{Instruction, OrderClass, OrderIntent, Side};
pub use quote::{PortfolioSnapshot, Quote};
pub use sentiment::{SentimentLabel, SentimentSignal};
pub use window::DateWindow;
