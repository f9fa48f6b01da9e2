use warp::Filter;

use crate::api::{handlers, AppState};

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// 추세/체결가/포지션 API 라우트 생성
pub fn create_routes(
    state: AppState,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    // 헬스체크 라우트
    let health = warp::path("health")
        .and(warp::get())
        .and_then(handlers::health_handler);

    // 추세 라우트
    let minute_trend = warp::path!("trends" / "minute" / String / String)
        .and(warp::get())
        .and(warp::query::<handlers::TrendQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::get_minute_trend);

    let daily_trend = warp::path!("trends" / "daily" / String / String)
        .and(warp::get())
        .and(warp::query::<handlers::TrendQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::get_daily_trend);

    // 실시간 체결가 수신 라우트
    let prices = warp::path!("prices")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .and_then(handlers::post_price);

    // 포지션 라우트
    let positions = warp::path!("positions" / String)
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::get_positions);

    // 자동매매 종목 라우트
    let trading_list = warp::path!("trading-list")
        .and(warp::get())
        .and(with_state(state.clone()))
        .and_then(handlers::get_trading_list)
        .or(warp::path!("trading-list")
            .and(warp::post())
            .and(warp::body::json())
            .and(with_state(state.clone()))
            .and_then(handlers::add_to_trading_list))
        .or(warp::path!("trading-list" / String)
            .and(warp::delete())
            .and(with_state(state))
            .and_then(handlers::remove_from_trading_list));

    // 모든 라우트 결합
    health
        .or(minute_trend)
        .or(daily_trend)
        .or(prices)
        .or(positions)
        .or(trading_list)
}
