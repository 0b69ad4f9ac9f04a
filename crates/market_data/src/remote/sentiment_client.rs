use std::env;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use common::traits::SentimentScorer;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

#[derive(Debug, Serialize)]
struct ScoreRequest<'a> {
    headlines: &'a [String],
}

#[derive(Debug, Deserialize)]
pub struct ScoreResponse {
    pub probability: f64,
    pub label: String,
}

/// Client for an external headline classifier (e.g. a FinBERT service).
#[derive(Clone)]
pub struct SentimentClient {
    client: Client,
    url: String,
}

impl SentimentClient {
    pub fn new(url: String) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("sentiment_trader/0.1.0")
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to build HTTP client.")?;
        Ok(Self { client, url })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let url = env::var("SENTIMENT_URL").context("SENTIMENT_URL not set")?;
        Self::new(url)
    }
}

#[async_trait]
impl SentimentScorer for SentimentClient {
    async fn score(&self, headlines: &[String]) -> anyhow::Result<(f64, String)> {
        let resp = self
            .client
            .post(&self.url)
            .json(&ScoreRequest { headlines })
            .send()
            .await
            .context("Failed to send request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().await.unwrap_or_default();
            error!("Sentiment service failed: {} {}", status, error_text);
            anyhow::bail!("HTTP {}: {}", status, error_text);
        }

        let scored = resp
            .json::<ScoreResponse>()
            .await
            .context("Failed to parse JSON response")?;
        debug!(
            "Sentiment service: {} ({:.4}) for {} headlines",
            scored.label,
            scored.probability,
            headlines.len()
        );
        Ok((scored.probability, scored.label))
    }
}
