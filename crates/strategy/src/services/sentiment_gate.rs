use std::sync::Arc;

use common::EngineError;
use common::models::{SentimentLabel, SentimentSignal, Side};
use common::traits::SentimentScorer;
use tracing::debug;

/// Threshold reading of a sentiment signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Positive,
    Negative,
    NoAction,
}

impl Verdict {
    /// Entry side the verdict calls for, if any.
    pub fn side(self) -> Option<Side> {
        match self {
            Self::Positive => Some(Side::Buy),
            Self::Negative => Some(Side::Sell),
            Self::NoAction => None,
        }
    }
}

pub struct SentimentGate {
    scorer: Arc<dyn SentimentScorer>,
    threshold: f64,
}

impl SentimentGate {
    pub fn new(scorer: Arc<dyn SentimentScorer>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Scores the batch through the external classifier and validates its output.
    pub async fn classify(&self, headlines: &[String]) -> Result<SentimentSignal, EngineError> {
        let (probability, label) = self
            .scorer
            .score(headlines)
            .await
            .map_err(|e| EngineError::InsufficientData(format!("sentiment scoring failed: {}", e)))?;

        let signal = Self::parse(probability, &label)?;
        debug!(
            "Scored {} headlines: {} ({:.4})",
            headlines.len(),
            signal.label,
            signal.probability
        );
        Ok(signal)
    }

    pub fn parse(probability: f64, label: &str) -> Result<SentimentSignal, EngineError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(EngineError::InsufficientData(format!(
                "sentiment probability {} is not in [0, 1]",
                probability
            )));
        }
        let label = label
            .parse::<SentimentLabel>()
            .map_err(EngineError::InsufficientData)?;
        Ok(SentimentSignal::new(probability, label))
    }

    /// Only a polar label strictly above the threshold is actionable.
    pub fn interpret(&self, signal: &SentimentSignal) -> Verdict {
        if signal.probability <= self.threshold {
            return Verdict::NoAction;
        }
        match signal.label {
            SentimentLabel::Positive => Verdict::Positive,
            SentimentLabel::Negative => Verdict::Negative,
            SentimentLabel::Neutral => Verdict::NoAction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::traits::MockSentimentScorer;

    fn gate_returning(probability: f64, label: &'static str) -> SentimentGate {
        let mut scorer = MockSentimentScorer::new();
        scorer
            .expect_score()
            .returning(move |_| Ok((probability, label.to_string())));
        SentimentGate::new(Arc::new(scorer), 0.999)
    }

    fn signal(probability: f64, label: SentimentLabel) -> SentimentSignal {
        SentimentSignal::new(probability, label)
    }

    #[test]
    fn test_threshold_is_strict() {
        let gate = gate_returning(0.0, "neutral");
        assert_eq!(gate.interpret(&signal(0.999, SentimentLabel::Positive)), Verdict::NoAction);
        assert_eq!(gate.interpret(&signal(0.999, SentimentLabel::Negative)), Verdict::NoAction);
        assert_eq!(gate.interpret(&signal(0.9991, SentimentLabel::Positive)), Verdict::Positive);
        assert_eq!(gate.interpret(&signal(0.9991, SentimentLabel::Negative)), Verdict::Negative);
    }

    #[test]
    fn test_neutral_never_acts() {
        let gate = gate_returning(0.0, "neutral");
        assert_eq!(gate.interpret(&signal(1.0, SentimentLabel::Neutral)), Verdict::NoAction);
        assert_eq!(gate.interpret(&signal(0.5, SentimentLabel::Neutral)), Verdict::NoAction);
    }

    #[test]
    fn test_low_confidence_polar_labels_do_not_act() {
        let gate = gate_returning(0.0, "neutral");
        for p in [0.0, 0.5, 0.9, 0.998] {
            assert_eq!(gate.interpret(&signal(p, SentimentLabel::Positive)), Verdict::NoAction);
            assert_eq!(gate.interpret(&signal(p, SentimentLabel::Negative)), Verdict::NoAction);
        }
    }

    #[test]
    fn test_verdict_sides() {
        assert_eq!(Verdict::Positive.side(), Some(Side::Buy));
        assert_eq!(Verdict::Negative.side(), Some(Side::Sell));
        assert_eq!(Verdict::NoAction.side(), None);
    }

    #[tokio::test]
    async fn test_classify_passes_scorer_output_through() {
        let gate = gate_returning(0.9995, "positive");
        let signal = gate.classify(&["Stocks rally".to_string()]).await.unwrap();
        assert_eq!(signal.label, SentimentLabel::Positive);
        assert_eq!(signal.probability, 0.9995);
    }

    #[tokio::test]
    async fn test_classify_accepts_empty_batch() {
        let gate = gate_returning(0.5, "neutral");
        let signal = gate.classify(&[]).await.unwrap();
        assert_eq!(gate.interpret(&signal), Verdict::NoAction);
    }

    #[tokio::test]
    async fn test_unknown_label_is_insufficient_data() {
        let gate = gate_returning(0.9999, "");
        let res = gate.classify(&[]).await;
        assert!(matches!(res, Err(EngineError::InsufficientData(_))));
    }

    #[tokio::test]
    async fn test_out_of_range_probability_is_insufficient_data() {
        for p in [f64::NAN, -0.1, 1.5] {
            let gate = gate_returning(p, "positive");
            assert!(matches!(
                gate.classify(&[]).await,
                Err(EngineError::InsufficientData(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_scorer_failure_is_insufficient_data() {
        let mut scorer = MockSentimentScorer::new();
        scorer
            .expect_score()
            .returning(|_| Err(anyhow::anyhow!("model offline")));
        let gate = SentimentGate::new(Arc::new(scorer), 0.999);
        let err = gate.classify(&[]).await.unwrap_err();
        assert!(err.to_string().contains("model offline"));
    }
}
