/**
* filename : trend_queue
* author : HAMA
* date: 2025. 5. 11.
* description: 종목별 추세 조회 직렬화 및 스로틀링 큐
**/

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::time::{sleep, timeout, Duration, Instant};

use crate::error::TradingError;
use crate::models::trend::TrendKey;
use crate::utils::logging;

/// 마지막 조회 완료 후 이 시간 안의 요청은 캐시로 응답
pub const FETCH_THROTTLE: Duration = Duration::from_millis(60_000);
/// 조회 1건의 최대 대기 시간
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);
/// 요청 간 고정 간격
pub const PACING_DELAY: Duration = Duration::from_millis(200);

/// 시세 조회 + 추세 계산 파이프라인
#[async_trait]
pub trait TrendFetcher: Send + Sync + 'static {
  type Output: Clone + Send + Sync + 'static;

  async fn fetch(&self, key: &TrendKey) -> Result<Self::Output, TradingError>;
}

struct QueueEntry<T> {
  key: TrendKey,
  // 백그라운드 갱신이면 None
  resolve: Option<oneshot::Sender<Option<T>>>,
}

struct QueueState<T> {
  cache: HashMap<TrendKey, T>,
  last_fetch: HashMap<TrendKey, Instant>,
  loading: HashSet<TrendKey>,
  pending_refresh: HashSet<TrendKey>,
  processing: bool,
}

impl<T> QueueState<T> {
  fn new() -> Self {
    QueueState {
      cache: HashMap::new(),
      last_fetch: HashMap::new(),
      loading: HashSet::new(),
      pending_refresh: HashSet::new(),
      processing: false,
    }
  }
}

/// FIFO 추세 요청 큐. 한 번에 하나의 조회만 진행된다.
///
/// 실패, 타임아웃, 패닉 모두 마지막 캐시 값(없으면 None)으로 응답하며 호출자에게 에러를 넘기지 않는다.
pub struct TrendQueue<T> {
  sender: mpsc::UnboundedSender<QueueEntry<T>>,
  state: Arc<RwLock<QueueState<T>>>,
}

impl<T> Clone for TrendQueue<T> {
  fn clone(&self) -> Self {
    TrendQueue {
      sender: self.sender.clone(),
      state: self.state.clone(),
    }
  }
}

impl<T: Clone + Send + Sync + 'static> TrendQueue<T> {
  /// 워커 태스크를 띄우고 큐 핸들 반환. tokio 런타임 안에서 호출해야 함
  pub fn start<F>(fetcher: Arc<F>) -> Self
  where
    F: TrendFetcher<Output = T>,
  {
    let (sender, receiver) = mpsc::unbounded_channel();
    let state = Arc::new(RwLock::new(QueueState::new()));

    tokio::spawn(run_worker(fetcher, state.clone(), receiver));

    TrendQueue { sender, state }
  }

  /// 추세 요청. 큐 순서대로 처리된 뒤 결과 반환
  pub async fn request_trend(&self, ticker: &str, exchange: &str) -> Option<T> {
    let key = TrendKey::new(ticker, exchange);
    let (resolve, reply) = oneshot::channel();

    if self.sender.send(QueueEntry { key: key.clone(), resolve: Some(resolve) }).is_err() {
      log::warn!("추세 큐 워커 종료됨 - 캐시로 응답: {}", key);
      return self.cached(&key).await;
    }

    match reply.await {
      Ok(result) => result,
      Err(_) => self.cached(&key).await,
    }
  }

  /// 응답을 기다리지 않는 갱신 요청. 이미 대기/조회 중이거나 스로틀 창 안이면 넣지 않고 false
  pub async fn refresh_if_due(&self, ticker: &str, exchange: &str) -> bool {
    let key = TrendKey::new(ticker, exchange);
    let mut st = self.state.write().await;

    let throttled = st
      .last_fetch
      .get(&key)
      .map_or(false, |last| last.elapsed() < FETCH_THROTTLE);
    if throttled || st.loading.contains(&key) || st.pending_refresh.contains(&key) {
      return false;
    }

    if self.sender.send(QueueEntry { key: key.clone(), resolve: None }).is_err() {
      log::warn!("추세 큐 워커 종료됨 - 갱신 생략: {}", key);
      return false;
    }
    st.pending_refresh.insert(key);
    true
  }

  /// 조회 진행 중 여부
  pub async fn is_loading(&self, ticker: &str, exchange: &str) -> bool {
    let key = TrendKey::new(ticker, exchange);
    self.state.read().await.loading.contains(&key)
  }

  /// 마지막으로 성공한 추세
  pub async fn cached_trend(&self, ticker: &str, exchange: &str) -> Option<T> {
    self.cached(&TrendKey::new(ticker, exchange)).await
  }

  /// 워커가 항목을 처리 중인지 (pacing 대기 포함)
  pub async fn is_processing(&self) -> bool {
    self.state.read().await.processing
  }

  async fn cached(&self, key: &TrendKey) -> Option<T> {
    self.state.read().await.cache.get(key).cloned()
  }
}

async fn run_worker<F: TrendFetcher>(
  fetcher: Arc<F>,
  state: Arc<RwLock<QueueState<F::Output>>>,
  mut receiver: mpsc::UnboundedReceiver<QueueEntry<F::Output>>,
) {
  while let Some(entry) = receiver.recv().await {
    {
      let mut st = state.write().await;
      st.processing = true;
      if entry.resolve.is_none() {
        st.pending_refresh.remove(&entry.key);
      }
    }

    let result = process_entry(&fetcher, &state, &entry.key).await;

    // 요청자가 이미 떠났으면 결과는 버림
    if let Some(resolve) = entry.resolve {
      let _ = resolve.send(result);
    }

    sleep(PACING_DELAY).await;

    if receiver.is_empty() {
      state.write().await.processing = false;
    }
  }

  log::debug!("추세 큐 워커 종료");
}

async fn process_entry<F: TrendFetcher>(
  fetcher: &Arc<F>,
  state: &Arc<RwLock<QueueState<F::Output>>>,
  key: &TrendKey,
) -> Option<F::Output> {
  {
    let st = state.read().await;
    if let Some(last) = st.last_fetch.get(key) {
      if last.elapsed() < FETCH_THROTTLE {
        logging::log_fetch_throttled(key, last.elapsed().as_millis());
        return st.cache.get(key).cloned();
      }
    }
  }

  state.write().await.loading.insert(key.clone());

  // 타임아웃이 나도 조회 태스크는 계속 돌고 결과만 버려진다
  let task = {
    let fetcher = fetcher.clone();
    let key = key.clone();
    tokio::spawn(async move { fetcher.fetch(&key).await })
  };
  let outcome = timeout(FETCH_TIMEOUT, task).await;

  let mut st = state.write().await;
  st.loading.remove(key);

  match outcome {
    Ok(Ok(Ok(trend))) => {
      st.cache.insert(key.clone(), trend.clone());
      st.last_fetch.insert(key.clone(), Instant::now());
      log::debug!("추세 조회 완료: {}", key);
      Some(trend)
    }
    Ok(Ok(Err(e))) => {
      logging::log_fetch_failed(key, &e);
      st.cache.get(key).cloned()
    }
    Ok(Err(join_error)) => {
      let e = TradingError::FetchFailed(join_error.to_string());
      logging::log_fetch_failed(key, &e);
      st.cache.get(key).cloned()
    }
    Err(_) => {
      let e = TradingError::Timeout(FETCH_TIMEOUT.as_millis() as u64);
      logging::log_fetch_failed(key, &e);
      st.cache.get(key).cloned()
    }
  }
}
