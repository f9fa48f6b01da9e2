/**
* filename : moving_averages
* author : HAMA
* date: 2025. 5. 11.
* description: 최신순 가격 시계열의 단순 이동평균
**/

use crate::models::market_data::PricePoint;

/// 추세 계산에 쓰는 이동평균 기간
pub const MA_WINDOWS: [usize; 4] = [20, 50, 100, 200];

/// 추세 한 건에 필요한 이동평균 샘플 수 (오늘 + 이전 4기간)
pub const SAMPLE_COUNT: usize = 5;

/// 기간 `period` 윈도우의 샘플 5개를 만들기 위한 최소 데이터 수
pub fn required_history(period: usize) -> usize {
  period + SAMPLE_COUNT - 1
}

/// `[index, index + period)` 구간 종가의 산술평균.
/// 데이터가 모자라거나 파싱할 수 없는 종가가 있으면 None
pub fn simple_moving_average(series: &[PricePoint], period: usize, index: usize) -> Option<f64> {
  if period == 0 {
    return None;
  }

  let end = index.checked_add(period)?;
  if end > series.len() {
    return None;
  }

  let mut sum = 0.0;
  for point in &series[index..end] {
    sum += point.close_price()?;
  }

  // 종가가 유한해도 합이 넘칠 수 있음
  if !sum.is_finite() {
    return None;
  }

  Some(sum / period as f64)
}

/// 앵커 0..=4의 이동평균 샘플 (index 0 = 오늘)
pub fn moving_average_samples(series: &[PricePoint], period: usize) -> [Option<f64>; SAMPLE_COUNT] {
  let mut samples = [None; SAMPLE_COUNT];
  for (index, sample) in samples.iter_mut().enumerate() {
    *sample = simple_moving_average(series, period, index);
  }
  samples
}
