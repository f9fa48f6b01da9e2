use std::collections::HashMap;
use tokio::sync::broadcast;

use crate::models::market_data::PriceTick;
use crate::error::TradingError;

/// 실시간 체결가 스트림. 종목별 broadcast 채널과 최신 틱 보관
pub struct PriceFeed {
    channels: HashMap<String, broadcast::Sender<PriceTick>>,
    latest_ticks: HashMap<String, PriceTick>,
    buffer_size: usize,
}

impl PriceFeed {
    pub fn new(buffer_size: usize) -> Self {
        PriceFeed {
            channels: HashMap::new(),
            latest_ticks: HashMap::new(),
            buffer_size,
        }
    }

    /// 종목 채널 생성 또는 가져오기
    pub fn get_or_create_channel(&mut self, ticker: &str) -> broadcast::Sender<PriceTick> {
        if let Some(sender) = self.channels.get(ticker) {
            sender.clone()
        } else {
            let (sender, _) = broadcast::channel(self.buffer_size);
            self.channels.insert(ticker.to_string(), sender.clone());
            sender
        }
    }

    /// 틱 저장 및 브로드캐스트
    pub fn publish(&mut self, tick: PriceTick) -> Result<(), TradingError> {
        let ticker = tick.ticker.clone();

        self.latest_ticks.insert(ticker.clone(), tick.clone());

        if let Some(sender) = self.channels.get(&ticker) {
            // 구독자가 없으면 send가 실패하지만 최신 틱은 이미 저장됨
            let _ = sender.send(tick);
            Ok(())
        } else {
            Err(TradingError::ChannelClosed(ticker))
        }
    }

    /// 최신 체결가
    pub fn latest_price(&self, ticker: &str) -> Option<f64> {
        self.latest_ticks.get(ticker).map(|t| t.last_price)
    }

    pub fn latest_tick(&self, ticker: &str) -> Option<PriceTick> {
        self.latest_ticks.get(ticker).cloned()
    }

    /// 틱 수신기 (채널이 없으면 생성)
    pub fn subscribe(&mut self, ticker: &str) -> broadcast::Receiver<PriceTick> {
        self.get_or_create_channel(ticker).subscribe()
    }
}
