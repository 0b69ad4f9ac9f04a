use common::models::{OrderClass, OrderIntent, Side};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct Account {
    pub cash: Decimal,
    #[serde(default)]
    pub trading_blocked: bool,
}

#[derive(Debug, Deserialize)]
pub struct LatestTradeResponse {
    pub symbol: String,
    pub trade: Trade,
}

#[derive(Debug, Deserialize)]
pub struct Trade {
    #[serde(rename = "p")]
    pub price: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    pub news: Vec<NewsArticle>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct NewsArticle {
    pub headline: String,
}

#[derive(Debug, Serialize)]
pub struct TakeProfitLeg {
    pub limit_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct StopLossLeg {
    pub stop_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub qty: String,
    pub side: Side,
    #[serde(rename = "type")]
    pub order_type: String,
    pub time_in_force: String,
    pub order_class: OrderClass,
    pub client_order_id: String,
    pub take_profit: TakeProfitLeg,
    pub stop_loss: StopLossLeg,
}

impl OrderRequest {
    /// Market entry with both exit legs attached, prices in whole cents.
    pub fn bracket(intent: &OrderIntent, client_order_id: String) -> Self {
        Self {
            symbol: intent.symbol.to_uppercase(),
            qty: intent.quantity.to_string(),
            side: intent.side,
            order_type: "market".to_string(),
            time_in_force: "gtc".to_string(),
            order_class: intent.order_class,
            client_order_id,
            take_profit: TakeProfitLeg {
                limit_price: to_cents(intent.take_profit_price),
            },
            stop_loss: StopLossLeg {
                stop_price: to_cents(intent.stop_loss_price),
            },
        }
    }
}

fn to_cents(price: Decimal) -> Decimal {
    let mut cents = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    cents
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: String,
    pub client_order_id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct OpenOrder {
    pub id: String,
    pub symbol: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn intent(side: Side, take_profit: Decimal, stop_loss: Decimal) -> OrderIntent {
        OrderIntent {
            symbol: "spy".to_string(),
            quantity: 100,
            side,
            order_class: OrderClass::Bracket,
            take_profit_price: take_profit,
            stop_loss_price: stop_loss,
        }
    }

    #[test]
    fn test_bracket_request_carries_both_legs() {
        let req = OrderRequest::bracket(&intent(Side::Buy, dec!(60.0), dec!(47.5)), "abc".into());
        let json = serde_json::to_value(&req).unwrap();

        assert_eq!(json["symbol"], "SPY");
        assert_eq!(json["qty"], "100");
        assert_eq!(json["side"], "buy");
        assert_eq!(json["type"], "market");
        assert_eq!(json["order_class"], "bracket");
        assert_eq!(json["client_order_id"], "abc");
        assert_eq!(json["take_profit"]["limit_price"], "60.00");
        assert_eq!(json["stop_loss"]["stop_price"], "47.50");
    }

    #[test]
    fn test_leg_prices_are_rounded_to_cents() {
        // 475.31 * 0.80 = 380.248, 475.31 * 1.05 = 499.0755
        let req = OrderRequest::bracket(
            &intent(Side::Sell, dec!(380.248), dec!(499.0755)),
            "xyz".into(),
        );
        assert_eq!(req.take_profit.limit_price, dec!(380.25));
        assert_eq!(req.stop_loss.stop_price, dec!(499.08));
        assert_eq!(req.side, Side::Sell);
    }

    #[test]
    fn test_parse_account_cash_string() {
        let account: Account =
            serde_json::from_str(r#"{"id":"x","cash":"100000.5","trading_blocked":false}"#).unwrap();
        assert_eq!(account.cash, dec!(100000.5));
        assert!(!account.trading_blocked);
    }

    #[test]
    fn test_parse_latest_trade() {
        let resp: LatestTradeResponse = serde_json::from_str(
            r#"{"symbol":"SPY","trade":{"t":"2024-01-03T20:59:59Z","x":"V","p":475.25,"s":100}}"#,
        )
        .unwrap();
        assert_eq!(resp.symbol, "SPY");
        assert_eq!(resp.trade.price, dec!(475.25));
    }

    #[test]
    fn test_parse_news_page() {
        let resp: NewsResponse = serde_json::from_str(
            r#"{"news":[{"id":1,"headline":"Fed holds rates","summary":""},{"id":2,"headline":"Stocks rally"}],"next_page_token":null}"#,
        )
        .unwrap();
        let headlines: Vec<_> = resp.news.into_iter().map(|n| n.headline).collect();
        assert_eq!(headlines, vec!["Fed holds rates", "Stocks rally"]);
        assert!(resp.next_page_token.is_none());
    }
}
