/**
* filename : trend
* author : HAMA
* date: 2025. 5. 11.
* description: 이동평균 기울기/가속도 기반 추세 지표
**/

use crate::models::market_data::PricePoint;
use crate::models::trend::{DetailedTrend, TrendMetric};
use super::moving_averages::{moving_average_samples, MA_WINDOWS, SAMPLE_COUNT};

/// 이 값보다 작은 절대값은 0으로 취급
pub const NEAR_ZERO: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
  Positive,
  Negative,
  Zero,
}

fn sign_of(x: f64) -> Sign {
  if x.abs() < NEAR_ZERO {
    Sign::Zero
  } else if x > 0.0 {
    Sign::Positive
  } else {
    Sign::Negative
  }
}

fn percent_change(curr: f64, prev: f64) -> f64 {
  if prev == 0.0 {
    return 0.0;
  }
  (curr - prev) / prev * 100.0
}

fn trend_label(slope: Sign) -> &'static str {
  match slope {
    Sign::Positive => "상승 추세",
    Sign::Negative => "하락 추세",
    Sign::Zero => "박스권 횡보",
  }
}

fn momentum_label(slope: Sign, accel: Sign) -> &'static str {
  match (slope, accel) {
    (_, Sign::Zero) => "모멘텀 유지",
    (Sign::Positive, Sign::Positive) => "상승폭 확대",
    (Sign::Positive, Sign::Negative) => "상승폭 둔화",
    (Sign::Negative, Sign::Positive) => "하락폭 축소/반등 시도",
    (Sign::Negative, Sign::Negative) => "하락폭 확대",
    (Sign::Zero, Sign::Positive) => "상승 전환 시도",
    (Sign::Zero, Sign::Negative) => "하락 전환 시도",
  }
}

/// 최신순 이동평균 샘플 5개로 기울기(%)와 가속도를 계산.
///
/// 샘플 중 하나라도 None이면 부분 계산 없이 `TrendMetric::insufficient()`를 반환한다.
pub fn calculate_trend_metrics(samples: &[Option<f64>; SAMPLE_COUNT]) -> TrendMetric {
  let mut values = [0.0; SAMPLE_COUNT];
  for (value, sample) in values.iter_mut().zip(samples.iter()) {
    match sample {
      Some(v) => *value = *v,
      None => return TrendMetric::insufficient(),
    }
  }

  let mut slopes = [0.0; SAMPLE_COUNT - 1];
  for i in 0..slopes.len() {
    slopes[i] = percent_change(values[i], values[i + 1]);
  }

  let mut accels = [0.0; SAMPLE_COUNT - 2];
  for i in 0..accels.len() {
    accels[i] = slopes[i] - slopes[i + 1];
  }

  let slope: f64 = slopes.iter().sum();
  let accel: f64 = accels.iter().sum();

  let slope_sign = sign_of(slope);
  let accel_sign = sign_of(accel);

  TrendMetric {
    value: values[0],
    slope,
    accel,
    description: format!("{} ({})", trend_label(slope_sign), momentum_label(slope_sign, accel_sign)),
  }
}

/// 한 윈도우의 지표를 시계열에서 바로 계산
pub fn trend_metric_for_window(series: &[PricePoint], period: usize) -> TrendMetric {
  calculate_trend_metrics(&moving_average_samples(series, period))
}

/// MA20/50/100/200 상세 추세. 윈도우마다 필요한 데이터 길이가 달라 각각 따로 계산한다
pub fn build_detailed_trend(ticker: &str, exchange: &str, series: &[PricePoint]) -> DetailedTrend {
  let [ma20, ma50, ma100, ma200] = MA_WINDOWS.map(|period| trend_metric_for_window(series, period));

  DetailedTrend {
    ticker: ticker.to_string(),
    exchange: exchange.to_string(),
    ma20,
    ma50,
    ma100,
    ma200,
  }
}
