use chrono::{DateTime, Duration, Utc};
use common::EngineError;
use common::models::DateWindow;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// News lookback ending on `now`'s calendar date.
pub fn window(now: DateTime<Utc>, lookback_days: u32) -> Result<DateWindow, EngineError> {
    let start = now
        .checked_sub_signed(Duration::days(i64::from(lookback_days)))
        .ok_or_else(|| {
            EngineError::Configuration(format!(
                "lookback of {} days from {} is out of range",
                lookback_days, now
            ))
        })?;
    Ok(DateWindow {
        start: start.format(DATE_FORMAT).to_string(),
        end: now.format(DATE_FORMAT).to_string(),
    })
}
