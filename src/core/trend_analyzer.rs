/**
* filename : trend_analyzer
* author : HAMA
* date: 2025. 5. 11.
* description: 시세 조회 후 일봉/분봉 추세 계산
**/

use std::sync::Arc;
use async_trait::async_trait;

use crate::core::trend_queue::TrendFetcher;
use crate::error::TradingError;
use crate::indicators::{build_categorical_trend, build_detailed_trend};
use crate::market_data::provider::{fetch_series, PriceHistoryProvider, SeriesInterval};
use crate::models::market_data::PricePoint;
use crate::models::trend::{CategoricalTrend, DetailedTrend, TrendKey};

/// MA200 샘플 5개(204개) + 여유 1개
pub const MIN_HISTORY_POINTS: usize = 205;

async fn load_series(
  provider: &dyn PriceHistoryProvider,
  interval: SeriesInterval,
  key: &TrendKey,
) -> Result<Vec<PricePoint>, TradingError> {
  let series = fetch_series(provider, interval, &key.ticker, &key.exchange).await?;

  if series.len() < MIN_HISTORY_POINTS {
    return Err(TradingError::InsufficientData {
      required: MIN_HISTORY_POINTS,
      actual: series.len(),
    });
  }

  log::debug!("{} {} 시세 {}건 수신", key, interval, series.len());
  Ok(series)
}

/// 분봉 상세 추세 (기울기/가속도)
pub struct MinuteTrendAnalyzer {
  provider: Arc<dyn PriceHistoryProvider>,
}

impl MinuteTrendAnalyzer {
  pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
    MinuteTrendAnalyzer { provider }
  }
}

#[async_trait]
impl TrendFetcher for MinuteTrendAnalyzer {
  type Output = DetailedTrend;

  async fn fetch(&self, key: &TrendKey) -> Result<DetailedTrend, TradingError> {
    let series = load_series(self.provider.as_ref(), SeriesInterval::Minute, key).await?;
    Ok(build_detailed_trend(&key.ticker, &key.exchange, &series))
  }
}

/// 일봉 범주형 추세
pub struct DailyTrendAnalyzer {
  provider: Arc<dyn PriceHistoryProvider>,
}

impl DailyTrendAnalyzer {
  pub fn new(provider: Arc<dyn PriceHistoryProvider>) -> Self {
    DailyTrendAnalyzer { provider }
  }
}

#[async_trait]
impl TrendFetcher for DailyTrendAnalyzer {
  type Output = CategoricalTrend;

  async fn fetch(&self, key: &TrendKey) -> Result<CategoricalTrend, TradingError> {
    let series = load_series(self.provider.as_ref(), SeriesInterval::Daily, key).await?;
    let trend = build_categorical_trend(&key.ticker, &key.exchange, &series);
    if trend.ma20.is_reversal() {
      log::info!("일봉 MA20 추세 전환: {} - {}", key, trend.ma20);
    }
    Ok(trend)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::market_data::provider::MockPriceHistoryProvider;
  use crate::models::trend::TrendType;

  fn rising_series(len: usize) -> Vec<PricePoint> {
    // 최신순: index 0이 가장 높은 가격
    (0..len)
      .map(|i| PricePoint::new(format!("d{}", i), None, format!("{}", 1000 - i)))
      .collect()
  }

  #[tokio::test]
  async fn test_minute_analyzer_builds_all_windows() {
    let mut provider = MockPriceHistoryProvider::new();
    provider
      .expect_fetch_minute_series()
      .withf(|ticker, exchange| ticker == "AAPL" && exchange == "NAS")
      .times(1)
      .returning(|_, _| Ok(rising_series(MIN_HISTORY_POINTS)));

    let analyzer = MinuteTrendAnalyzer::new(Arc::new(provider));
    let trend = analyzer.fetch(&TrendKey::new("AAPL", "NAS")).await.unwrap();

    assert_eq!(trend.ticker, "AAPL");
    for metric in [&trend.ma20, &trend.ma50, &trend.ma100, &trend.ma200] {
      assert!(!metric.is_insufficient());
      assert!(metric.slope > 0.0);
      assert!(metric.description.starts_with("상승 추세"));
    }
  }

  #[tokio::test]
  async fn test_short_series_is_error() {
    let mut provider = MockPriceHistoryProvider::new();
    provider
      .expect_fetch_daily_series()
      .returning(|_, _| Ok(rising_series(204)));

    let analyzer = DailyTrendAnalyzer::new(Arc::new(provider));
    let result = analyzer.fetch(&TrendKey::new("005930", "KRX")).await;

    assert!(matches!(result, Err(TradingError::InsufficientData { required: 205, actual: 204 })));
  }

  #[tokio::test]
  async fn test_daily_analyzer_uptrend() {
    let mut provider = MockPriceHistoryProvider::new();
    provider
      .expect_fetch_daily_series()
      .returning(|_, _| Ok(rising_series(300)));

    let analyzer = DailyTrendAnalyzer::new(Arc::new(provider));
    let trend = analyzer.fetch(&TrendKey::new("005930", "KRX")).await.unwrap();

    assert_eq!(trend.ma20, TrendType::Up);
    assert_eq!(trend.ma200, TrendType::Up);
  }
}
