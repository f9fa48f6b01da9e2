//! 추세 분석과 자동매매 판단의 핵심 구현체

pub mod auto_trader;
pub mod trend_analyzer;
pub mod trend_queue;

pub use auto_trader::{AutoTradeSession, AutoTradeStatus, AutoTrader};
pub use trend_analyzer::{DailyTrendAnalyzer, MinuteTrendAnalyzer};
pub use trend_queue::{TrendFetcher, TrendQueue};
