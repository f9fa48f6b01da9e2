/**
* filename : auto_trader
* author : HAMA
* date: 2025. 5. 11.
* description: MA20 분봉 추세 기반 자동매매 판단
**/

use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration, Instant, MissedTickBehavior};

use crate::core::trend_queue::TrendQueue;
use crate::error::TradingError;
use crate::models::market_data::PriceTick;
use crate::models::position::{latest_open_position, Position};
use crate::models::trade::{TradeAction, TradeSignal};
use crate::models::trend::{DetailedTrend, TrendKey, TrendMetric};
use crate::order_core::repository::{PositionSource, TradeSink, TradingListStore};
use crate::utils::logging;

/// 같은 종목의 자동매매 최소 간격 (트리거 시점 기준)
pub const TRADE_COOLDOWN: Duration = Duration::from_secs(60);
/// 매수/매도 상태가 Idle로 돌아가는 시간. 체결 확인과 무관
pub const STATUS_RESET_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoTradeStatus {
  Idle,
  Buying,
  Selling,
}

/// 종목 하나의 자동매매 상태 머신
#[derive(Debug)]
pub struct AutoTrader {
  ticker: String,
  status: AutoTradeStatus,
  status_changed_at: Option<Instant>,
  last_auto_trade_time: Option<Instant>,
  prev_trend: Option<TrendMetric>,
  current_trend: Option<TrendMetric>,
}

impl AutoTrader {
  pub fn new(ticker: impl Into<String>) -> Self {
    AutoTrader {
      ticker: ticker.into(),
      status: AutoTradeStatus::Idle,
      status_changed_at: None,
      last_auto_trade_time: None,
      prev_trend: None,
      current_trend: None,
    }
  }

  pub fn ticker(&self) -> &str {
    &self.ticker
  }

  /// 새 MA20 지표 반영. 직전 값과 같으면 무시하고 false 반환
  pub fn observe_trend(&mut self, metric: TrendMetric) -> bool {
    if self.current_trend.as_ref() == Some(&metric) {
      return false;
    }
    self.prev_trend = self.current_trend.take();
    self.current_trend = Some(metric);
    true
  }

  pub fn current_trend(&self) -> Option<&TrendMetric> {
    self.current_trend.as_ref()
  }

  pub fn prev_trend(&self) -> Option<&TrendMetric> {
    self.prev_trend.as_ref()
  }

  /// 타이머 경과를 반영한 현재 상태
  pub fn status(&self, now: Instant) -> AutoTradeStatus {
    match self.status_changed_at {
      Some(changed) if now.saturating_duration_since(changed) >= STATUS_RESET_DELAY => AutoTradeStatus::Idle,
      _ => self.status,
    }
  }

  pub fn in_cooldown(&self, now: Instant) -> bool {
    self.last_auto_trade_time
      .map_or(false, |last| now.saturating_duration_since(last) < TRADE_COOLDOWN)
  }

  /// 매수/매도/관망 판단. 신호를 내면 상태와 쿨다운이 즉시 시작된다
  pub fn evaluate(&mut self, now: Instant, price: Option<f64>, positions: &[Position]) -> Option<TradeSignal> {
    let (current, _prev) = match (&self.current_trend, &self.prev_trend) {
      (Some(current), Some(prev)) => (current, prev),
      _ => return None,
    };

    let price = price.filter(|p| p.is_finite() && *p > 0.0)?;

    if self.status(now) != AutoTradeStatus::Idle || self.in_cooldown(now) {
      return None;
    }

    let own: Vec<Position> = positions
      .iter()
      .filter(|p| p.ticker == self.ticker && p.is_open())
      .cloned()
      .collect();
    let head = latest_open_position(&own);

    let slope = current.slope;
    let accel = current.accel;

    let signal = if let (Some(head), true) = (head, slope > 0.0 && accel < 0.0) {
      TradeSignal::new(&self.ticker, price, head.buy_quantity, TradeAction::Sell)
    } else if slope > 0.0 && accel > 0.0 {
      if let Some(head) = head {
        // 물타기만 허용
        if price >= head.buy_price {
          return None;
        }
      }
      let quantity = 2f64.powi(own.len() as i32);
      TradeSignal::new(&self.ticker, price, quantity, TradeAction::Buy)
    } else {
      return None;
    };

    self.status = match signal.action {
      TradeAction::Buy => AutoTradeStatus::Buying,
      TradeAction::Sell => AutoTradeStatus::Selling,
    };
    self.status_changed_at = Some(now);
    self.last_auto_trade_time = Some(now);

    Some(signal)
  }
}

/// 판단 유닛을 포지션 저장소와 체결 계층에 연결한 종목별 세션
pub struct AutoTradeSession {
  key: TrendKey,
  trader: AutoTrader,
  positions: Arc<dyn PositionSource>,
  sink: Arc<dyn TradeSink>,
  trading_list: Arc<dyn TradingListStore>,
  last_price: Option<f64>,
}

impl AutoTradeSession {
  pub fn new(
    key: TrendKey,
    positions: Arc<dyn PositionSource>,
    sink: Arc<dyn TradeSink>,
    trading_list: Arc<dyn TradingListStore>,
  ) -> Self {
    let trader = AutoTrader::new(key.ticker.clone());
    AutoTradeSession {
      key,
      trader,
      positions,
      sink,
      trading_list,
      last_price: None,
    }
  }

  pub fn trader(&self) -> &AutoTrader {
    &self.trader
  }

  /// 새 추세 수신. 마지막 체결가로 즉시 재평가
  pub async fn on_trend(&mut self, trend: &DetailedTrend) -> Result<Option<TradeSignal>, TradingError> {
    if self.trader.observe_trend(trend.ma20.clone()) {
      logging::log_trend_updated(&self.key, &trend.ma20);
    }
    self.evaluate().await
  }

  /// 실시간 체결가 수신
  pub async fn on_price(&mut self, price: f64) -> Result<Option<TradeSignal>, TradingError> {
    self.last_price = Some(price);
    self.evaluate().await
  }

  async fn evaluate(&mut self) -> Result<Option<TradeSignal>, TradingError> {
    if !self.trading_list.contains(&self.key.ticker).await? {
      return Ok(None);
    }

    let positions = self.positions.positions(&self.key.ticker).await?;
    let signal = match self.trader.evaluate(Instant::now(), self.last_price, &positions) {
      Some(signal) => signal,
      None => return Ok(None),
    };

    logging::log_trade_triggered(&signal);

    // 실패해도 쿨다운은 이미 시작됨. 재시도하지 않음
    match self.sink.submit(&signal).await {
      Ok(()) => {
        logging::log_trade_submitted(&signal);
        Ok(Some(signal))
      }
      Err(e) => {
        logging::log_error(&format!("{} 자동매매 주문 실패", self.key), &e);
        Err(TradingError::SubmissionFailed(e.to_string()))
      }
    }
  }

  /// 체결가 스트림과 주기적 추세 갱신을 처리하는 루프
  pub async fn run(
    mut self,
    queue: TrendQueue<DetailedTrend>,
    mut ticks: broadcast::Receiver<PriceTick>,
    refresh: Duration,
  ) {
    logging::log_session_start(&self.key);

    let mut refresh_timer = interval(refresh);
    refresh_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
      tokio::select! {
        _ = refresh_timer.tick() => {
          if let Some(trend) = queue.request_trend(&self.key.ticker, &self.key.exchange).await {
            if let Err(e) = self.on_trend(&trend).await {
              logging::log_error(&format!("{} 추세 처리", self.key), &e);
            }
          }
        }
        received = ticks.recv() => {
          match received {
            Ok(tick) => {
              if let Err(e) = self.on_price(tick.last_price).await {
                logging::log_error(&format!("{} 체결가 처리", self.key), &e);
              }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
              log::warn!("{} 체결가 {}건 누락", self.key, skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
          }
        }
      }
    }

    logging::log_session_end(&self.key);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration as ChronoDuration, Utc};

  fn metric(slope: f64, accel: f64) -> TrendMetric {
    TrendMetric {
      value: 100.0,
      slope,
      accel,
      description: String::new(),
    }
  }

  fn seeded(slope: f64, accel: f64) -> AutoTrader {
    let mut trader = AutoTrader::new("AAPL");
    trader.observe_trend(metric(0.1, 0.1));
    trader.observe_trend(metric(slope, accel));
    trader
  }

  #[test]
  fn test_first_observation_only_seeds() {
    let mut trader = AutoTrader::new("AAPL");
    trader.observe_trend(metric(1.0, 1.0));

    assert!(trader.prev_trend().is_none());
    assert!(trader.evaluate(Instant::now(), Some(100.0), &[]).is_none());
  }

  #[test]
  fn test_duplicate_trend_does_not_shift() {
    let mut trader = AutoTrader::new("AAPL");
    assert!(trader.observe_trend(metric(1.0, 1.0)));
    assert!(!trader.observe_trend(metric(1.0, 1.0)));
    assert!(trader.prev_trend().is_none());
  }

  #[test]
  fn test_invalid_price_skipped() {
    let now = Instant::now();
    for price in [None, Some(0.0), Some(-5.0), Some(f64::NAN), Some(f64::INFINITY)] {
      let mut trader = seeded(1.0, 1.0);
      assert!(trader.evaluate(now, price, &[]).is_none());
      assert_eq!(trader.status(now), AutoTradeStatus::Idle);
    }
  }

  #[test]
  fn test_buy_then_status_resets_by_timer() {
    let now = Instant::now();
    let mut trader = seeded(1.0, 1.0);

    let signal = trader.evaluate(now, Some(100.0), &[]).unwrap();
    assert_eq!(signal.action, TradeAction::Buy);
    assert_eq!(signal.quantity, 1.0);
    assert_eq!(trader.status(now), AutoTradeStatus::Buying);
    assert_eq!(trader.status(now + STATUS_RESET_DELAY), AutoTradeStatus::Idle);
  }

  #[test]
  fn test_sell_takes_lifo_head_quantity() {
    let now = Instant::now();
    let t0 = Utc::now();
    let positions = vec![
      Position::open("AAPL", 100.0, 1.0, t0),
      Position::open("AAPL", 95.0, 2.0, t0 + ChronoDuration::minutes(1)),
    ];

    let mut trader = seeded(1.0, -0.5);
    let signal = trader.evaluate(now, Some(101.0), &positions).unwrap();

    assert_eq!(signal.action, TradeAction::Sell);
    assert_eq!(signal.quantity, 2.0);
    assert_eq!(trader.status(now), AutoTradeStatus::Selling);
  }

  #[test]
  fn test_sell_condition_without_position_is_noop() {
    let mut trader = seeded(1.0, -0.5);
    assert!(trader.evaluate(Instant::now(), Some(101.0), &[]).is_none());
  }

  #[test]
  fn test_downtrend_never_trades() {
    let now = Instant::now();
    let positions = vec![Position::open("AAPL", 100.0, 1.0, Utc::now())];

    for (slope, accel) in [(-1.0, 1.0), (-1.0, -1.0), (0.0, 1.0), (1.0, 0.0)] {
      let mut trader = seeded(slope, accel);
      assert!(trader.evaluate(now, Some(90.0), &positions).is_none());
    }
  }

  #[test]
  fn test_other_ticker_positions_ignored() {
    let positions = vec![Position::open("TSLA", 50.0, 1.0, Utc::now())];
    let mut trader = seeded(1.0, 1.0);

    let signal = trader.evaluate(Instant::now(), Some(100.0), &positions).unwrap();
    assert_eq!(signal.quantity, 1.0);
  }

  fn detailed(slope: f64, accel: f64) -> DetailedTrend {
    DetailedTrend {
      ticker: "AAPL".to_string(),
      exchange: "NAS".to_string(),
      ma20: metric(slope, accel),
      ma50: TrendMetric::insufficient(),
      ma100: TrendMetric::insufficient(),
      ma200: TrendMetric::insufficient(),
    }
  }

  #[tokio::test]
  async fn test_session_submits_sell_for_lifo_head() {
    use crate::order_core::repository::{MockPositionSource, MockTradeSink, MockTradingListStore};

    let head = Position::open("AAPL", 98.0, 2.0, Utc::now());

    let mut list = MockTradingListStore::new();
    list.expect_contains().returning(|_| Ok(true));

    let mut positions = MockPositionSource::new();
    positions
      .expect_positions()
      .withf(|ticker| ticker == "AAPL")
      .returning(move |_| Ok(vec![head.clone()]));

    let mut sink = MockTradeSink::new();
    sink
      .expect_submit()
      .withf(|signal| signal.action == TradeAction::Sell && signal.quantity == 2.0)
      .times(1)
      .returning(|_| Ok(()));

    let mut session = AutoTradeSession::new(
      TrendKey::new("AAPL", "NAS"),
      Arc::new(positions),
      Arc::new(sink),
      Arc::new(list),
    );

    assert!(session.on_price(101.0).await.unwrap().is_none());
    assert!(session.on_trend(&detailed(0.4, 0.2)).await.unwrap().is_none());

    let signal = session.on_trend(&detailed(0.3, -0.1)).await.unwrap().unwrap();
    assert_eq!(signal.price, 101.0);
  }

  #[tokio::test]
  async fn test_session_skips_lookup_when_not_listed() {
    use crate::order_core::repository::{MockPositionSource, MockTradeSink, MockTradingListStore};

    let mut list = MockTradingListStore::new();
    list.expect_contains().returning(|_| Ok(false));
    let mut positions = MockPositionSource::new();
    positions.expect_positions().never();
    let mut sink = MockTradeSink::new();
    sink.expect_submit().never();

    let mut session = AutoTradeSession::new(
      TrendKey::new("AAPL", "NAS"),
      Arc::new(positions),
      Arc::new(sink),
      Arc::new(list),
    );

    session.on_trend(&detailed(0.4, 0.2)).await.unwrap();
    session.on_trend(&detailed(0.5, 0.3)).await.unwrap();
    assert!(session.on_price(100.0).await.unwrap().is_none());
  }
}
