use serde::{Deserialize, Serialize};

/// 가격 시계열의 단일 샘플 (KIS 응답은 종가를 문자열로 전달)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: String,
    #[serde(default)]
    pub time: Option<String>,
    pub close: String,
}

impl PricePoint {
    pub fn new(date: impl Into<String>, time: Option<String>, close: impl Into<String>) -> Self {
        PricePoint {
            date: date.into(),
            time,
            close: close.into(),
        }
    }

    /// 종가를 f64로 파싱. 유한한 숫자가 아니면 None
    pub fn close_price(&self) -> Option<f64> {
        self.close
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// 정렬용 키 (date + time)
    pub fn sort_key(&self) -> (String, String) {
        (self.date.clone(), self.time.clone().unwrap_or_default())
    }
}

/// 실시간 체결가 틱
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTick {
    pub ticker: String,
    pub last_price: f64,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub timestamp: i64,
}

impl PriceTick {
    pub fn new(ticker: impl Into<String>, last_price: f64, timestamp: i64) -> Self {
        PriceTick {
            ticker: ticker.into(),
            last_price,
            bid: None,
            ask: None,
            timestamp,
        }
    }

    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }
}
