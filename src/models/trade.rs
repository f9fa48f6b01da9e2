use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TradeAction {
    Buy,
    Sell,
}

impl fmt::Display for TradeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeAction::Buy => write!(f, "buy"),
            TradeAction::Sell => write!(f, "sell"),
        }
    }
}

/// 자동매매 판단 결과. 저장되지 않고 체결/저장 계층으로 전달됨
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TradeSignal {
    pub ticker: String,
    pub price: f64,
    pub quantity: f64,
    pub action: TradeAction,
}

impl TradeSignal {
    pub fn new(ticker: impl Into<String>, price: f64, quantity: f64, action: TradeAction) -> Self {
        TradeSignal {
            ticker: ticker.into(),
            price,
            quantity,
            action,
        }
    }

    pub fn value(&self) -> f64 {
        self.price * self.quantity
    }
}
