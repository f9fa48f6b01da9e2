use crate::error::TradingError;
use crate::models::trade::TradeSignal;

/// 주문 신호 검증기 인터페이스
pub trait SignalValidator: Send + Sync {
    /// 신호 검증
    fn validate(&self, signal: &TradeSignal) -> Result<(), TradingError>;
}

/// 기본 신호 검증기
pub struct BasicSignalValidator;

impl SignalValidator for BasicSignalValidator {
    fn validate(&self, signal: &TradeSignal) -> Result<(), TradingError> {
        if signal.ticker.trim().is_empty() {
            return Err(TradingError::InvalidParameter("Ticker must not be empty".to_string()));
        }

        // 수량 검증
        if !signal.quantity.is_finite() || signal.quantity <= 0.0 {
            return Err(TradingError::InvalidParameter("Quantity must be positive".to_string()));
        }

        // 가격 검증
        if !signal.price.is_finite() || signal.price <= 0.0 {
            return Err(TradingError::InvalidParameter("Price must be positive".to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::trade::TradeAction;

    #[test]
    fn test_rejects_bad_signals() {
        let validator = BasicSignalValidator;

        assert!(validator.validate(&TradeSignal::new("AAPL", 100.0, 1.0, TradeAction::Buy)).is_ok());
        assert!(validator.validate(&TradeSignal::new("", 100.0, 1.0, TradeAction::Buy)).is_err());
        assert!(validator.validate(&TradeSignal::new("AAPL", 0.0, 1.0, TradeAction::Buy)).is_err());
        assert!(validator.validate(&TradeSignal::new("AAPL", 100.0, -1.0, TradeAction::Sell)).is_err());
    }
}
