use std::collections::BTreeSet;
use async_trait::async_trait;
use chrono::Utc;
#[cfg(test)]
use mockall::automock;
use tokio::sync::RwLock;

use crate::error::TradingError;
use crate::models::position::{latest_open_position, open_positions, Position};
use crate::models::trade::{TradeAction, TradeSignal};
use crate::order_core::validator::{BasicSignalValidator, SignalValidator};

/// 포지션 이력 조회 인터페이스
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PositionSource: Send + Sync {
    /// 종목의 전체 포지션 (청산 포함)
    async fn positions(&self, ticker: &str) -> Result<Vec<Position>, TradingError>;
}

/// 자동매매 신호 체결/저장 인터페이스
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TradeSink: Send + Sync {
    async fn submit(&self, signal: &TradeSignal) -> Result<(), TradingError>;
}

/// 자동매매 대상 종목 목록
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TradingListStore: Send + Sync {
    async fn contains(&self, ticker: &str) -> Result<bool, TradingError>;

    async fn add(&self, ticker: &str) -> Result<(), TradingError>;

    async fn remove(&self, ticker: &str) -> Result<(), TradingError>;

    async fn list(&self) -> Result<Vec<String>, TradingError>;
}

/// 메모리 기반 포지션 저장소. 매수는 포지션을 열고, 매도는 가장 최근 포지션을 닫는다
pub struct InMemoryPositionRepository {
    positions: RwLock<Vec<Position>>,
    trading_list: RwLock<BTreeSet<String>>,
    validator: Box<dyn SignalValidator>,
}

impl InMemoryPositionRepository {
    pub fn new() -> Self {
        InMemoryPositionRepository {
            positions: RwLock::new(Vec::new()),
            trading_list: RwLock::new(BTreeSet::new()),
            validator: Box::new(BasicSignalValidator),
        }
    }

    /// 종목의 미청산 포지션 수
    pub async fn open_count(&self, ticker: &str) -> usize {
        let positions = self.positions.read().await;
        open_positions(&positions)
            .into_iter()
            .filter(|p| p.ticker == ticker)
            .count()
    }
}

impl Default for InMemoryPositionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PositionSource for InMemoryPositionRepository {
    async fn positions(&self, ticker: &str) -> Result<Vec<Position>, TradingError> {
        let filtered: Vec<Position> = self.positions
            .read()
            .await
            .iter()
            .filter(|p| p.ticker == ticker)
            .cloned()
            .collect();

        Ok(filtered)
    }
}

#[async_trait]
impl TradeSink for InMemoryPositionRepository {
    async fn submit(&self, signal: &TradeSignal) -> Result<(), TradingError> {
        self.validator.validate(signal)?;

        let mut positions = self.positions.write().await;
        let now = Utc::now();

        match signal.action {
            TradeAction::Buy => {
                positions.push(Position::open(&signal.ticker, signal.price, signal.quantity, now));
            }
            TradeAction::Sell => {
                let own: Vec<Position> = positions
                    .iter()
                    .filter(|p| p.ticker == signal.ticker)
                    .cloned()
                    .collect();
                let head_id = latest_open_position(&own)
                    .map(|p| p.id.clone())
                    .ok_or_else(|| TradingError::PositionNotFound(signal.ticker.clone()))?;

                if let Some(position) = positions.iter_mut().find(|p| p.id == head_id) {
                    position.close(signal.price, signal.quantity, now);
                    if let Some(pnl) = position.realized_pnl() {
                        log::info!("포지션 청산: {} - 실현손익: {:.2}", signal.ticker, pnl);
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl TradingListStore for InMemoryPositionRepository {
    async fn contains(&self, ticker: &str) -> Result<bool, TradingError> {
        Ok(self.trading_list.read().await.contains(ticker))
    }

    async fn add(&self, ticker: &str) -> Result<(), TradingError> {
        if ticker.trim().is_empty() {
            return Err(TradingError::InvalidParameter("Ticker must not be empty".to_string()));
        }
        self.trading_list.write().await.insert(ticker.trim().to_string());
        Ok(())
    }

    async fn remove(&self, ticker: &str) -> Result<(), TradingError> {
        self.trading_list.write().await.remove(ticker);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, TradingError> {
        Ok(self.trading_list.read().await.iter().cloned().collect())
    }
}
