/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::time::Duration;

use kisTrend::api::{routes, AppState};
use kisTrend::config::Config;
use kisTrend::core::{AutoTradeSession, DailyTrendAnalyzer, MinuteTrendAnalyzer, TrendQueue};
use kisTrend::market_data::{CsvPriceHistoryProvider, PriceFeed, PriceHistoryProvider, RandomWalkProvider};
use kisTrend::order_core::{InMemoryPositionRepository, TradingListStore};
use kisTrend::utils::logging;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("추세 분석 서버 시작... (v{})", kisTrend::VERSION);

    // 시세 제공자 선택
    let provider: Arc<dyn PriceHistoryProvider> = if config.data.use_mock {
        log::info!("랜덤 워크 시세 사용");
        Arc::new(RandomWalkProvider::new(300))
    } else {
        log::info!("CSV 시세 디렉터리: {}", config.data.directory);
        Arc::new(CsvPriceHistoryProvider::new(config.data.directory.clone(), ','))
    };

    // 추세 큐 생성 (일봉/분봉 각각)
    let minute_trends = TrendQueue::start(Arc::new(MinuteTrendAnalyzer::new(provider.clone())));
    let daily_trends = TrendQueue::start(Arc::new(DailyTrendAnalyzer::new(provider.clone())));

    let repository = Arc::new(InMemoryPositionRepository::new());
    let feed = Arc::new(RwLock::new(PriceFeed::new(1000)));

    // 관심 종목별 자동매매 세션
    let refresh = Duration::from_secs(config.trading.trend_refresh_secs);
    for key in config.watch_keys()? {
        if config.trading.auto_trade {
            repository.add(&key.ticker).await?;
        }

        let ticks = feed.write().await.subscribe(&key.ticker);
        let session = AutoTradeSession::new(
            key,
            repository.clone(),
            repository.clone(),
            repository.clone(),
        );
        tokio::spawn(session.run(minute_trends.clone(), ticks, refresh));
    }

    let state = AppState {
        minute_trends,
        daily_trends,
        feed,
        repository,
    };

    // API 라우트 초기화
    let routes = routes::create_routes(state);
    log::info!("API 라우트 초기화 완료");

    // Warp 서버 시작
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    log::info!("서버 시작: http://{}/", addr);
    warp::serve(routes).run(addr).await;

    Ok(())
}
