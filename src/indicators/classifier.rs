/**
* filename : classifier
* author : HAMA
* date: 2025. 5. 11.
* description: 일봉 이동평균 원값 기반 범주형 추세 분류
**/

use crate::models::market_data::PricePoint;
use crate::models::trend::{CategoricalTrend, TrendType};
use super::moving_averages::{moving_average_samples, MA_WINDOWS, SAMPLE_COUNT};

fn compare(curr: f64, prev: f64) -> TrendType {
  if curr > prev {
    TrendType::Up
  } else if curr < prev {
    TrendType::Down
  } else {
    TrendType::Flat
  }
}

/// 오늘과 어제의 이동평균을 비교하고, 이전 4일 흐름이 한 방향이었다면 전환 여부를 판단.
///
/// 샘플이 하나라도 없으면 `유지`. 상세 지표의 "데이터 부족"과는 다른 값이다.
pub fn classify_daily_trend(mas: &[Option<f64>; SAMPLE_COUNT]) -> TrendType {
  let mut values = [0.0; SAMPLE_COUNT];
  for (value, ma) in values.iter_mut().zip(mas.iter()) {
    match ma {
      Some(v) => *value = *v,
      None => return TrendType::Flat,
    }
  }

  let today = compare(values[0], values[1]);
  let prior: Vec<TrendType> = (1..SAMPLE_COUNT - 1)
    .map(|i| compare(values[i], values[i + 1]))
    .collect();

  let all_down = prior.iter().all(|t| *t == TrendType::Down);
  let all_up = prior.iter().all(|t| *t == TrendType::Up);

  match today {
    TrendType::Up | TrendType::Flat if all_down => TrendType::TurningUp,
    TrendType::Down | TrendType::Flat if all_up => TrendType::TurningDown,
    _ => today,
  }
}

/// MA20/50/100/200 범주형 추세
pub fn build_categorical_trend(ticker: &str, exchange: &str, series: &[PricePoint]) -> CategoricalTrend {
  let [ma20, ma50, ma100, ma200] =
    MA_WINDOWS.map(|period| classify_daily_trend(&moving_average_samples(series, period)));

  CategoricalTrend {
    ticker: ticker.to_string(),
    exchange: exchange.to_string(),
    ma20,
    ma50,
    ma100,
    ma200,
  }
}
