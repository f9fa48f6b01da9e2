use std::fmt;
use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::models::market_data::PricePoint;
use crate::error::TradingError;

/// 시세 간격
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesInterval {
    Daily,
    Minute,
}

impl SeriesInterval {
    pub fn file_suffix(&self) -> &'static str {
        match self {
            SeriesInterval::Daily => "daily",
            SeriesInterval::Minute => "minute",
        }
    }
}

impl fmt::Display for SeriesInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_suffix())
    }
}

/// 과거 시세 제공자 인터페이스. 반환 시계열은 최신순 (index 0 = 가장 최근)
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// 일봉 시계열 조회
    async fn fetch_daily_series(&self, ticker: &str, exchange: &str) -> Result<Vec<PricePoint>, TradingError>;

    /// 분봉 시계열 조회
    async fn fetch_minute_series(&self, ticker: &str, exchange: &str) -> Result<Vec<PricePoint>, TradingError>;
}

/// 간격에 맞는 조회 메서드로 위임
pub async fn fetch_series(
    provider: &dyn PriceHistoryProvider,
    interval: SeriesInterval,
    ticker: &str,
    exchange: &str,
) -> Result<Vec<PricePoint>, TradingError> {
    match interval {
        SeriesInterval::Daily => provider.fetch_daily_series(ticker, exchange).await,
        SeriesInterval::Minute => provider.fetch_minute_series(ticker, exchange).await,
    }
}
