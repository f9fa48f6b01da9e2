//! 자동매매 판단 테스트
//!
//! 물타기 가격 조건, 수량 배증, 쿨다운, 세션-저장소 연동 검증

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use tokio::time::{Duration, Instant};

use kisTrend::core::auto_trader::{AutoTradeStatus, STATUS_RESET_DELAY, TRADE_COOLDOWN};
use kisTrend::core::{AutoTradeSession, AutoTrader};
use kisTrend::error::TradingError;
use kisTrend::models::position::Position;
use kisTrend::models::trade::{TradeAction, TradeSignal};
use kisTrend::models::trend::{DetailedTrend, TrendKey, TrendMetric};
use kisTrend::order_core::{InMemoryPositionRepository, PositionSource, TradeSink, TradingListStore};

fn metric(slope: f64, accel: f64) -> TrendMetric {
  TrendMetric {
    value: 100.0,
    slope,
    accel,
    description: "테스트".to_string(),
  }
}

fn trend(slope: f64, accel: f64) -> DetailedTrend {
  DetailedTrend {
    ticker: "AAPL".to_string(),
    exchange: "NAS".to_string(),
    ma20: metric(slope, accel),
    ma50: TrendMetric::insufficient(),
    ma100: TrendMetric::insufficient(),
    ma200: TrendMetric::insufficient(),
  }
}

fn ready_trader(slope: f64, accel: f64) -> AutoTrader {
  let mut trader = AutoTrader::new("AAPL");
  trader.observe_trend(metric(-0.2, 0.1));
  trader.observe_trend(metric(slope, accel));
  trader
}

fn open_positions(prices: &[(f64, f64)]) -> Vec<Position> {
  let t0 = Utc::now();
  prices
    .iter()
    .enumerate()
    .map(|(i, (price, qty))| Position::open("AAPL", *price, *qty, t0 + ChronoDuration::seconds(i as i64)))
    .collect()
}

/// 항상 실패하는 체결 계층
struct RejectingSink {
  attempts: AtomicUsize,
}

#[async_trait]
impl TradeSink for RejectingSink {
  async fn submit(&self, _signal: &TradeSignal) -> Result<(), TradingError> {
    self.attempts.fetch_add(1, Ordering::SeqCst);
    Err(TradingError::SubmissionFailed("broker rejected".to_string()))
  }
}

#[test]
fn test_no_trade_on_first_observation() {
  let mut trader = AutoTrader::new("AAPL");
  trader.observe_trend(metric(2.0, 1.0));

  assert!(trader.evaluate(Instant::now(), Some(100.0), &[]).is_none());
  assert_eq!(trader.status(Instant::now()), AutoTradeStatus::Idle);
}

#[test]
fn test_averaging_down_price_guard() {
  let positions = open_positions(&[(100.0, 1.0)]);

  let mut above = ready_trader(1.0, 0.5);
  assert!(above.evaluate(Instant::now(), Some(105.0), &positions).is_none());

  let mut equal = ready_trader(1.0, 0.5);
  assert!(equal.evaluate(Instant::now(), Some(100.0), &positions).is_none());

  let mut below = ready_trader(1.0, 0.5);
  let signal = below.evaluate(Instant::now(), Some(95.0), &positions).unwrap();
  assert_eq!(signal.action, TradeAction::Buy);
  assert_eq!(signal.price, 95.0);
}

#[test]
fn test_quantity_doubles_with_open_positions() {
  let mut fresh = ready_trader(1.0, 0.5);
  assert_eq!(fresh.evaluate(Instant::now(), Some(50.0), &[]).unwrap().quantity, 1.0);

  let positions = open_positions(&[(100.0, 1.0), (98.0, 2.0)]);
  let mut stacked = ready_trader(1.0, 0.5);
  assert_eq!(stacked.evaluate(Instant::now(), Some(90.0), &positions).unwrap().quantity, 4.0);
}

#[test]
fn test_closed_positions_do_not_count() {
  let mut positions = open_positions(&[(100.0, 1.0), (98.0, 2.0)]);
  positions[1].close(99.0, 2.0, Utc::now());

  let mut trader = ready_trader(1.0, 0.5);
  let signal = trader.evaluate(Instant::now(), Some(90.0), &positions).unwrap();
  assert_eq!(signal.quantity, 2.0);
}

#[test]
fn test_sell_only_latest_position() {
  let positions = open_positions(&[(100.0, 1.0), (98.0, 2.0), (96.0, 4.0)]);
  let mut trader = ready_trader(0.8, -0.3);

  let signal = trader.evaluate(Instant::now(), Some(97.0), &positions).unwrap();
  assert_eq!(signal.action, TradeAction::Sell);
  assert_eq!(signal.quantity, 4.0);
}

#[test]
fn test_cooldown_blocks_then_allows_retrigger() {
  let t0 = Instant::now();
  let mut trader = ready_trader(1.0, 0.5);

  assert!(trader.evaluate(t0, Some(100.0), &[]).is_some());

  // 상태가 Idle로 돌아와도 쿨다운 동안은 조용하다
  let after_reset = t0 + STATUS_RESET_DELAY;
  assert_eq!(trader.status(after_reset), AutoTradeStatus::Idle);
  assert!(trader.in_cooldown(after_reset));
  assert!(trader.evaluate(after_reset, Some(99.0), &[]).is_none());
  assert!(trader.evaluate(t0 + Duration::from_secs(59), Some(99.0), &[]).is_none());

  let signal = trader.evaluate(t0 + TRADE_COOLDOWN, Some(99.0), &[]);
  assert!(signal.is_some());
}

#[test]
fn test_status_resets_even_without_fill() {
  let t0 = Instant::now();
  let positions = open_positions(&[(100.0, 1.0)]);
  let mut trader = ready_trader(1.0, -1.0);

  trader.evaluate(t0, Some(101.0), &positions).unwrap();
  assert_eq!(trader.status(t0 + Duration::from_secs(4)), AutoTradeStatus::Selling);
  assert_eq!(trader.status(t0 + Duration::from_secs(5)), AutoTradeStatus::Idle);
}

#[tokio::test]
async fn test_session_buys_and_sells_through_repository() {
  let repository = Arc::new(InMemoryPositionRepository::new());
  repository.add("AAPL").await.unwrap();

  let mut session = AutoTradeSession::new(
    TrendKey::new("AAPL", "NAS"),
    repository.clone(),
    repository.clone(),
    repository.clone(),
  );

  assert!(session.on_trend(&trend(-0.5, 0.2)).await.unwrap().is_none());
  assert!(session.on_price(100.0).await.unwrap().is_none());

  let bought = session.on_trend(&trend(0.6, 0.3)).await.unwrap().unwrap();
  assert_eq!(bought.action, TradeAction::Buy);
  assert_eq!(repository.open_count("AAPL").await, 1);

  // 쿨다운 중에는 다음 추세가 와도 주문하지 않음
  assert!(session.on_trend(&trend(0.7, -0.1)).await.unwrap().is_none());
  assert_eq!(repository.positions("AAPL").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_ignores_ticker_outside_trading_list() {
  let repository = Arc::new(InMemoryPositionRepository::new());
  let mut session = AutoTradeSession::new(
    TrendKey::new("AAPL", "NAS"),
    repository.clone(),
    repository.clone(),
    repository.clone(),
  );

  session.on_trend(&trend(-0.5, 0.2)).await.unwrap();
  session.on_trend(&trend(0.6, 0.3)).await.unwrap();
  assert!(session.on_price(100.0).await.unwrap().is_none());

  assert!(repository.positions("AAPL").await.unwrap().is_empty());
  // 판단 자체가 돌지 않았으므로 쿨다운도 없음
  assert!(!session.trader().in_cooldown(Instant::now()));
}

#[tokio::test]
async fn test_submission_failure_still_consumes_cooldown() {
  let repository = Arc::new(InMemoryPositionRepository::new());
  repository.add("AAPL").await.unwrap();
  let sink = Arc::new(RejectingSink { attempts: AtomicUsize::new(0) });

  let mut session = AutoTradeSession::new(
    TrendKey::new("AAPL", "NAS"),
    repository.clone(),
    sink.clone(),
    repository.clone(),
  );

  session.on_price(100.0).await.unwrap();
  session.on_trend(&trend(-0.5, 0.2)).await.unwrap();

  let failed = session.on_trend(&trend(0.6, 0.3)).await;
  assert!(matches!(failed, Err(TradingError::SubmissionFailed(_))));
  assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);

  // 재시도 없음
  assert!(session.on_price(99.0).await.unwrap().is_none());
  assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
  assert!(session.trader().in_cooldown(Instant::now()));
}
