use std::env;

pub mod alpaca_client;
pub mod alpaca_models;
pub mod sentiment_client;

pub use alpaca_client::AlpacaClient;
pub use sentiment_client::SentimentClient;

pub fn get_trading_base_url() -> String {
    env::var("ALPACA_BASE_URL").unwrap_or_else(|_| "https://paper-api.alpaca.markets".to_string())
}

pub fn get_data_base_url() -> String {
    env::var("ALPACA_DATA_URL").unwrap_or_else(|_| "https://data.alpaca.markets".to_string())
}
