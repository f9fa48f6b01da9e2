// 추세/체결가/포지션 API 핸들러

use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::{json, with_status, Reply};

use crate::api::AppState;
use crate::core::trend_queue::TrendQueue;
use crate::error::TradingError;
use crate::models::market_data::PriceTick;
use crate::order_core::repository::{PositionSource, TradingListStore};
use crate::utils::{current_timestamp_ms, timestamp_to_datetime};

/// 추세 조회 쿼리. wait=true면 큐 처리 완료까지 대기
#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
  pub wait: Option<bool>,
}

/// 추세 응답. 조회 중에도 마지막 값을 함께 내려준다
#[derive(Debug, Serialize)]
pub struct TrendResponse<T> {
  pub ticker: String,
  pub exchange: String,
  pub loading: bool,
  pub trend: Option<T>,
}

/// 자동매매 종목 추가 요청 모델
#[derive(Debug, Deserialize)]
pub struct TradingListRequest {
  pub ticker: String,
}

fn error_reply(e: &TradingError, status: StatusCode) -> warp::reply::WithStatus<warp::reply::Json> {
  let error_response = serde_json::json!({ "error": e.to_string() });
  with_status(json(&error_response), status)
}

/// 헬스체크 핸들러
pub async fn health_handler() -> Result<impl Reply, warp::Rejection> {
  Ok(json(&serde_json::json!({ "status": "ok" })))
}

async fn trend_reply<T>(
  queue: TrendQueue<T>,
  exchange: String,
  ticker: String,
  query: TrendQuery,
) -> Result<warp::reply::WithStatus<warp::reply::Json>, warp::Rejection>
where
  T: Clone + Serialize + Send + Sync + 'static,
{
  let trend = if query.wait.unwrap_or(false) {
    queue.request_trend(&ticker, &exchange).await
  } else {
    // 캐시 값을 바로 응답하고 갱신이 필요할 때만 큐에 넣음
    if queue.refresh_if_due(&ticker, &exchange).await {
      log::debug!("추세 갱신 예약: {}:{}", ticker, exchange);
    }
    queue.cached_trend(&ticker, &exchange).await
  };

  let loading = queue.is_loading(&ticker, &exchange).await;
  let response = TrendResponse { ticker, exchange, loading, trend };

  Ok(with_status(json(&response), StatusCode::OK))
}

/// 분봉 상세 추세 핸들러
pub async fn get_minute_trend(
  exchange: String,
  ticker: String,
  query: TrendQuery,
  state: AppState,
) -> Result<impl Reply, warp::Rejection> {
  trend_reply(state.minute_trends.clone(), exchange, ticker, query).await
}

/// 일봉 범주형 추세 핸들러
pub async fn get_daily_trend(
  exchange: String,
  ticker: String,
  query: TrendQuery,
  state: AppState,
) -> Result<impl Reply, warp::Rejection> {
  trend_reply(state.daily_trends.clone(), exchange, ticker, query).await
}

/// 실시간 체결가 수신 핸들러
pub async fn post_price(
  mut tick: PriceTick,
  state: AppState,
) -> Result<impl Reply, warp::Rejection> {
  if !tick.last_price.is_finite() || tick.last_price <= 0.0 {
    let e = TradingError::InvalidParameter(format!("invalid price {}", tick.last_price));
    return Ok(error_reply(&e, StatusCode::BAD_REQUEST));
  }

  if tick.timestamp <= 0 {
    tick.timestamp = current_timestamp_ms();
  }
  log::debug!("체결가 수신: {} {} ({}) 스프레드: {:?}",
              tick.ticker, tick.last_price, timestamp_to_datetime(tick.timestamp), tick.spread());

  // 구독 중인 세션이 없으면 최신가만 저장됨
  let _ = state.feed.write().await.publish(tick);

  Ok(with_status(json(&serde_json::json!({ "status": "accepted" })), StatusCode::ACCEPTED))
}

/// 종목 포지션 조회 핸들러
pub async fn get_positions(
  ticker: String,
  state: AppState,
) -> Result<impl Reply, warp::Rejection> {
  match state.repository.positions(&ticker).await {
    Ok(positions) => Ok(with_status(json(&positions), StatusCode::OK)),
    Err(e) => Ok(error_reply(&e, StatusCode::INTERNAL_SERVER_ERROR)),
  }
}

/// 자동매매 종목 목록 핸들러
pub async fn get_trading_list(state: AppState) -> Result<impl Reply, warp::Rejection> {
  match state.repository.list().await {
    Ok(list) => Ok(with_status(json(&list), StatusCode::OK)),
    Err(e) => Ok(error_reply(&e, StatusCode::INTERNAL_SERVER_ERROR)),
  }
}

/// 자동매매 종목 추가 핸들러
pub async fn add_to_trading_list(
  req: TradingListRequest,
  state: AppState,
) -> Result<impl Reply, warp::Rejection> {
  match state.repository.add(&req.ticker).await {
    Ok(()) => {
      let response = serde_json::json!({ "status": "success", "ticker": req.ticker });
      Ok(with_status(json(&response), StatusCode::CREATED))
    }
    Err(e) => Ok(error_reply(&e, StatusCode::BAD_REQUEST)),
  }
}

/// 자동매매 종목 제거 핸들러
pub async fn remove_from_trading_list(
  ticker: String,
  state: AppState,
) -> Result<impl Reply, warp::Rejection> {
  match state.repository.remove(&ticker).await {
    Ok(()) => {
      let response = serde_json::json!({ "status": "success", "ticker": ticker });
      Ok(with_status(json(&response), StatusCode::OK))
    }
    Err(e) => Ok(error_reply(&e, StatusCode::INTERNAL_SERVER_ERROR)),
  }
}
