//! 이동평균 추세 분석 및 자동매매 신호 라이브러리
//!
//! KIS 일봉/분봉 시세로 추세를 계산하고, MA20 분봉 추세로 매수/매도 신호를 냅니다.

pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod models;
pub mod order_core;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::TradingError;
pub use crate::models::market_data::{PricePoint, PriceTick};
pub use crate::models::position::Position;
pub use crate::models::trade::{TradeAction, TradeSignal};
pub use crate::models::trend::{CategoricalTrend, DetailedTrend, TrendKey, TrendMetric, TrendType};
pub use crate::core::{AutoTradeSession, AutoTrader, TrendQueue};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, TradingError>;
