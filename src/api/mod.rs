/**
* filename : mod
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

pub mod handlers;
pub mod routes;

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::trend_queue::TrendQueue;
use crate::market_data::stream::PriceFeed;
use crate::models::trend::{CategoricalTrend, DetailedTrend};
use crate::order_core::repository::InMemoryPositionRepository;

/// 핸들러가 공유하는 애플리케이션 상태
#[derive(Clone)]
pub struct AppState {
    pub minute_trends: TrendQueue<DetailedTrend>,
    pub daily_trends: TrendQueue<CategoricalTrend>,
    pub feed: Arc<RwLock<PriceFeed>>,
    pub repository: Arc<InMemoryPositionRepository>,
}
