//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::TradingError;
use crate::models::trade::TradeSignal;
use crate::models::trend::{TrendKey, TrendMetric};

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화. RUST_LOG가 설정되어 있으면 설정 파일 값보다 우선
pub fn init(default_level: &str) -> Result<(), TradingError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    builder
      .filter_level(parse_level(&log_level))
      .format_timestamp_millis()
      .try_init()
      .map_err(|e| TradingError::ConfigError(format!("Failed to init logger: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 자동매매 세션 시작 로그
pub fn log_session_start(key: &TrendKey) {
    log::info!("자동매매 세션 시작: {}", key);
}

/// 자동매매 세션 종료 로그
pub fn log_session_end(key: &TrendKey) {
    log::info!("자동매매 세션 종료: {}", key);
}

/// MA20 추세 갱신 로그
pub fn log_trend_updated(key: &TrendKey, metric: &TrendMetric) {
    log::info!("추세 갱신: {} - MA20 {:.2} - 기울기: {:.4} - 가속도: {:.4} - {}",
               key, metric.value, metric.slope, metric.accel, metric.description);
}

/// 스로틀로 조회 생략
pub fn log_fetch_throttled(key: &TrendKey, elapsed_ms: u128) {
    log::debug!("조회 생략 (마지막 조회 {}ms 전): {}", elapsed_ms, key);
}

/// 조회 실패 로그 (캐시로 대체됨)
pub fn log_fetch_failed(key: &TrendKey, error: &TradingError) {
    log::warn!("추세 조회 실패, 캐시 사용 - {}: {}", key, error);
}

/// 자동매매 신호 발생 로그
pub fn log_trade_triggered(signal: &TradeSignal) {
    log::info!("자동매매 신호: {} - 종목: {} - 수량: {} - 가격: {}",
               signal.action, signal.ticker, signal.quantity, signal.price);
}

/// 주문 전달 완료 로그
pub fn log_trade_submitted(signal: &TradeSignal) {
    log::info!("자동매매 주문 전달: {} - 종목: {} - 수량: {} - 가격: {} - 금액: {:.2}",
               signal.action, signal.ticker, signal.quantity, signal.price, signal.value());
}

/// 오류 로그
pub fn log_error(context: &str, error: &TradingError) {
    log::error!("오류 발생 - {}: {}", context, error);
}
