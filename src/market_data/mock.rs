use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;

use crate::error::TradingError;
use crate::market_data::provider::PriceHistoryProvider;
use crate::models::market_data::PricePoint;

/// 개발용 랜덤 워크 시세 제공자
pub struct RandomWalkProvider {
    length: usize,
    base_prices: HashMap<String, f64>,
}

impl RandomWalkProvider {
    pub fn new(length: usize) -> Self {
        let mut base_prices = HashMap::new();
        base_prices.insert("AAPL".to_string(), 185.0);
        base_prices.insert("TSLA".to_string(), 240.0);
        base_prices.insert("005930".to_string(), 71000.0);

        RandomWalkProvider { length, base_prices }
    }

    fn generate(&self, ticker: &str, step: Duration, with_time: bool) -> Vec<PricePoint> {
        let mut rng = rand::thread_rng();
        let now = Utc::now();
        let mut last_price = *self.base_prices.get(ticker).unwrap_or(&100.0);
        let mut series = Vec::with_capacity(self.length);

        for i in 0..self.length {
            let ts = now - step * i as i32;
            let change: f64 = rng.gen_range(-0.01..0.01);
            last_price = (last_price * (1.0 + change)).max(0.01);

            series.push(PricePoint {
                date: ts.format("%Y%m%d").to_string(),
                time: with_time.then(|| ts.format("%H%M%S").to_string()),
                close: format!("{:.2}", last_price),
            });
        }

        series
    }
}

#[async_trait]
impl PriceHistoryProvider for RandomWalkProvider {
    async fn fetch_daily_series(&self, ticker: &str, _exchange: &str) -> Result<Vec<PricePoint>, TradingError> {
        Ok(self.generate(ticker, Duration::days(1), false))
    }

    async fn fetch_minute_series(&self, ticker: &str, _exchange: &str) -> Result<Vec<PricePoint>, TradingError> {
        Ok(self.generate(ticker, Duration::minutes(1), true))
    }
}
