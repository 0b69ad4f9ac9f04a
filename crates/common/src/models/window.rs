use serde::{Deserialize, Serialize};

/// Inclusive news lookback window as `YYYY-MM-DD` calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: String,
    pub end: String,
}
