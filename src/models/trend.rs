/**
* filename : trend
* author : HAMA
* date: 2025. 5. 11.
* description: 분봉(상세) 추세와 일봉(범주형) 추세 모델
**/

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::TradingError;

/// 데이터 부족 시 description
pub const INSUFFICIENT_DATA_LABEL: &str = "데이터 부족";

/// 캐시 및 스로틀 키 (종목 + 거래소)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrendKey {
    pub ticker: String,
    pub exchange: String,
}

impl TrendKey {
    pub fn new(ticker: impl Into<String>, exchange: impl Into<String>) -> Self {
        TrendKey {
            ticker: ticker.into(),
            exchange: exchange.into(),
        }
    }
}

impl fmt::Display for TrendKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ticker, self.exchange)
    }
}

impl FromStr for TrendKey {
    type Err = TradingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((ticker, exchange)) if !ticker.trim().is_empty() && !exchange.trim().is_empty() => {
                Ok(TrendKey::new(ticker.trim(), exchange.trim()))
            }
            _ => Err(TradingError::InvalidParameter(format!("expected TICKER:EXCHANGE, got '{}'", s))),
        }
    }
}

/// 단일 이동평균 윈도우의 기울기/가속도 지표
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendMetric {
    pub value: f64,
    pub slope: f64,
    pub accel: f64,
    pub description: String,
}

impl TrendMetric {
    /// 5개 샘플 중 하나라도 없을 때의 값
    pub fn insufficient() -> Self {
        TrendMetric {
            value: 0.0,
            slope: 0.0,
            accel: 0.0,
            description: INSUFFICIENT_DATA_LABEL.to_string(),
        }
    }

    pub fn is_insufficient(&self) -> bool {
        self.description == INSUFFICIENT_DATA_LABEL
    }
}

/// 분봉 기반 상세 추세
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedTrend {
    pub ticker: String,
    pub exchange: String,
    pub ma20: TrendMetric,
    pub ma50: TrendMetric,
    pub ma100: TrendMetric,
    pub ma200: TrendMetric,
}

/// 일봉 범주형 추세 값
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendType {
    #[serde(rename = "상승")]
    Up,
    #[serde(rename = "상승전환")]
    TurningUp,
    #[serde(rename = "하락")]
    Down,
    #[serde(rename = "하락전환")]
    TurningDown,
    #[serde(rename = "유지")]
    Flat,
}

impl TrendType {
    pub fn label(&self) -> &'static str {
        match self {
            TrendType::Up => "상승",
            TrendType::TurningUp => "상승전환",
            TrendType::Down => "하락",
            TrendType::TurningDown => "하락전환",
            TrendType::Flat => "유지",
        }
    }

    pub fn is_reversal(&self) -> bool {
        matches!(self, TrendType::TurningUp | TrendType::TurningDown)
    }
}

impl fmt::Display for TrendType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 일봉 기반 범주형 추세
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalTrend {
    pub ticker: String,
    pub exchange: String,
    pub ma20: TrendType,
    pub ma50: TrendType,
    pub ma100: TrendType,
    pub ma200: TrendType,
}
