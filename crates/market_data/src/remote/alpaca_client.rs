use std::env;
use std::time::Duration;

use anyhow::{Context, bail};
use async_trait::async_trait;
use common::models::{DateWindow, OrderIntent};
use common::traits::{AccountSource, Broker, NewsSource, PriceFeed};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::remote::alpaca_models::{
    Account, LatestTradeResponse, NewsResponse, OpenOrder, OrderRequest, OrderResponse,
};
use crate::remote::{get_data_base_url, get_trading_base_url};

const NEWS_PAGE_LIMIT: u32 = 50;
const MAX_NEWS_PAGES: usize = 5;

/// Alpaca trading + market data REST adapter. Paper endpoint unless `ALPACA_BASE_URL` says otherwise.
#[derive(Clone)]
pub struct AlpacaClient {
    client: Client,
    trading_url: String,
    data_url: String,
    key_id: String,
    secret_key: String,
}

impl AlpacaClient {
    pub fn new(
        key_id: String,
        secret_key: String,
        trading_url: String,
        data_url: String,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent("sentiment_trader/0.1.0")
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client.")?;

        Ok(Self {
            client,
            trading_url: trading_url.trim_end_matches('/').to_string(),
            data_url: data_url.trim_end_matches('/').to_string(),
            key_id,
            secret_key,
        })
    }

    pub fn from_env() -> anyhow::Result<Self> {
        let key_id = env::var("ALPACA_API_KEY").context("ALPACA_API_KEY not set")?;
        let secret_key = env::var("ALPACA_API_SECRET").context("ALPACA_API_SECRET not set")?;
        Self::new(key_id, secret_key, get_trading_base_url(), get_data_base_url())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("APCA-API-KEY-ID", &self.key_id)
            .header("APCA-API-SECRET-KEY", &self.secret_key)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> anyhow::Result<T> {
        let resp = self
            .authorized(self.client.get(url))
            .query(query)
            .send()
            .await
            .context("Failed to send request")?;

        Self::ensure_success(resp, "GET", url)
            .await?
            .json::<T>()
            .await
            .context("Failed to parse JSON response")
    }

    async fn delete(&self, url: &str) -> anyhow::Result<Response> {
        self.authorized(self.client.delete(url))
            .send()
            .await
            .context("Failed to send request")
    }

    async fn ensure_success(resp: Response, method: &str, url: &str) -> anyhow::Result<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        error!("Alpaca {} {} failed: {} {}", method, url, status, body);
        bail!("HTTP {}: {}", status, body);
    }

    async fn cancel_open_orders(&self, symbol: &str) -> anyhow::Result<usize> {
        let url = format!("{}/v2/orders", self.trading_url);
        let open: Vec<OpenOrder> = self
            .get_json(
                &url,
                &[("status", "open".to_string()), ("symbols", symbol.to_string())],
            )
            .await?;

        let targets = orders_for(&open, symbol);
        for order in &targets {
            let cancel_url = format!("{}/v2/orders/{}", self.trading_url, order.id);
            let resp = self.delete(&cancel_url).await?;
            Self::ensure_success(resp, "DELETE", &cancel_url).await?;
        }
        Ok(targets.len())
    }
}

/// The `symbols` filter is advisory on some Alpaca endpoints; only touch orders for `symbol`.
fn orders_for<'a>(open: &'a [OpenOrder], symbol: &str) -> Vec<&'a OpenOrder> {
    open.iter()
        .filter(|o| o.symbol.eq_ignore_ascii_case(symbol))
        .collect()
}

#[async_trait]
impl AccountSource for AlpacaClient {
    async fn cash(&self) -> anyhow::Result<Decimal> {
        let url = format!("{}/v2/account", self.trading_url);
        let account: Account = self.get_json(&url, &[]).await?;
        if account.trading_blocked {
            warn!("Alpaca account is blocked from trading");
        }
        Ok(account.cash)
    }
}

#[async_trait]
impl PriceFeed for AlpacaClient {
    async fn last_price(&self, symbol: &str) -> anyhow::Result<Decimal> {
        let url = format!(
            "{}/v2/stocks/{}/trades/latest",
            self.data_url,
            symbol.to_uppercase()
        );
        let latest: LatestTradeResponse = self.get_json(&url, &[]).await?;
        debug!("Latest {} trade at {}", latest.symbol, latest.trade.price);
        Ok(latest.trade.price)
    }
}

#[async_trait]
impl NewsSource for AlpacaClient {
    async fn headlines(&self, symbol: &str, window: &DateWindow) -> anyhow::Result<Vec<String>> {
        let url = format!("{}/v1beta1/news", self.data_url);
        let mut headlines = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_NEWS_PAGES {
            let mut query = vec![
                ("symbols", symbol.to_uppercase()),
                ("start", window.start.clone()),
                ("end", window.end.clone()),
                ("limit", NEWS_PAGE_LIMIT.to_string()),
            ];
            if let Some(token) = page_token.take() {
                query.push(("page_token", token));
            }

            let page: NewsResponse = self.get_json(&url, &query).await?;
            headlines.extend(page.news.into_iter().map(|article| article.headline));

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(headlines)
    }
}

#[async_trait]
impl Broker for AlpacaClient {
    async fn submit_order(&self, order: &OrderIntent) -> anyhow::Result<()> {
        let request = OrderRequest::bracket(order, Uuid::new_v4().to_string());
        let url = format!("{}/v2/orders", self.trading_url);

        info!(
            "Placing Order: {} {} {} (TP={} SL={})",
            request.side,
            request.qty,
            request.symbol,
            request.take_profit.limit_price,
            request.stop_loss.stop_price
        );

        let resp = self
            .authorized(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .context("Failed to send request")?;

        let placed = Self::ensure_success(resp, "POST", &url)
            .await?
            .json::<OrderResponse>()
            .await
            .context("Failed to parse JSON response")?;

        info!(
            "ORDER ACCEPTED: ID={}, ClientID={}, Status={}",
            placed.id, placed.client_order_id, placed.status
        );
        Ok(())
    }

    async fn liquidate_all(&self, symbol: &str) -> anyhow::Result<()> {
        let symbol = symbol.to_uppercase();

        // Bracket legs hold the shares, so they go first.
        let cancelled = self.cancel_open_orders(&symbol).await?;
        debug!("Cancelled {} open orders for {}", cancelled, symbol);

        let url = format!("{}/v2/positions/{}", self.trading_url, symbol);
        let resp = self.delete(&url).await?;
        if resp.status() == StatusCode::NOT_FOUND {
            warn!("No open {} position to liquidate", symbol);
            return Ok(());
        }
        Self::ensure_success(resp, "DELETE", &url).await?;

        info!("Liquidated {} position", symbol);
        Ok(())
    }
}
