use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            "neutral" => Ok(Self::Neutral),
            other => Err(format!("unknown sentiment label '{}'", other)),
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negative => write!(f, "negative"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// Aggregate polarity of a batch of headlines, as reported by the scoring service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentSignal {
    pub probability: f64,
    pub label: SentimentLabel,
}

impl SentimentSignal {
    pub fn new(probability: f64, label: SentimentLabel) -> Self {
        Self { probability, label }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing_is_case_insensitive() {
        assert_eq!("Positive".parse::<SentimentLabel>(), Ok(SentimentLabel::Positive));
        assert_eq!(" negative ".parse::<SentimentLabel>(), Ok(SentimentLabel::Negative));
        assert_eq!("NEUTRAL".parse::<SentimentLabel>(), Ok(SentimentLabel::Neutral));
        assert!("bullish".parse::<SentimentLabel>().is_err());
        assert!("".parse::<SentimentLabel>().is_err());
    }
}
