use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 매수 기록. sell_price가 None이면 미청산 포지션
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub id: String,
    pub ticker: String,
    pub buy_price: f64,
    pub buy_quantity: f64,
    pub buy_time: DateTime<Utc>,
    pub sell_price: Option<f64>,
    pub sell_quantity: Option<f64>,
    pub sell_time: Option<DateTime<Utc>>,
}

impl Position {
    pub fn open(ticker: impl Into<String>, buy_price: f64, buy_quantity: f64, buy_time: DateTime<Utc>) -> Self {
        Position {
            id: Uuid::new_v4().to_string(),
            ticker: ticker.into(),
            buy_price,
            buy_quantity,
            buy_time,
            sell_price: None,
            sell_quantity: None,
            sell_time: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.sell_price.is_none()
    }

    pub fn close(&mut self, sell_price: f64, sell_quantity: f64, sell_time: DateTime<Utc>) {
        self.sell_price = Some(sell_price);
        self.sell_quantity = Some(sell_quantity);
        self.sell_time = Some(sell_time);
    }

    /// 실현 손익 (청산된 경우만)
    pub fn realized_pnl(&self) -> Option<f64> {
        let sell_price = self.sell_price?;
        let quantity = self.sell_quantity.unwrap_or(self.buy_quantity);
        Some((sell_price - self.buy_price) * quantity)
    }
}

/// 미청산 포지션만 추림
pub fn open_positions(positions: &[Position]) -> Vec<&Position> {
    positions.iter().filter(|p| p.is_open()).collect()
}

/// 가장 최근에 매수한 미청산 포지션 (LIFO head)
pub fn latest_open_position(positions: &[Position]) -> Option<&Position> {
    positions
        .iter()
        .filter(|p| p.is_open())
        .max_by_key(|p| p.buy_time)
}
