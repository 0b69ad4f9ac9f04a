use chrono::{DateTime, Utc};
use common::traits::Clock;

/// Wall-clock time for live runs.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
