/**
* filename : config
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::TradingError;
use crate::models::trend::TrendKey;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub data: DataConfig,
    pub trading: TradingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV price history root (`<dir>/<exchange>/<ticker>_daily.csv`)
    pub directory: String,
    /// 랜덤 워크 시세 사용 여부
    pub use_mock: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingConfig {
    /// `TICKER:EXCHANGE` 형식
    pub watch_list: Vec<String>,
    pub auto_trade: bool,
    /// 분봉 추세 갱신 주기. 조회 스로틀(60초)이 완료 시점부터 세므로 60초보다 커야 매 주기 새로 조회됨
    pub trend_refresh_secs: u64,
}

impl Config {
    /// Load configuration from `config.json`, falling back to defaults
    pub fn load() -> Result<Self, TradingError> {
        Self::load_from(Path::new("config.json"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, TradingError> {
        let mut cfg = if config_path.exists() {
            let mut file = File::open(config_path)
                .map_err(|e| TradingError::ConfigError(format!("Failed to open config file: {}", e)))?;

            let mut contents = String::new();
            file.read_to_string(&mut contents)
                .map_err(|e| TradingError::ConfigError(format!("Failed to read config file: {}", e)))?;

            serde_json::from_str::<Config>(&contents)
                .map_err(|e| TradingError::ConfigError(format!("Failed to parse config file: {}", e)))?
        } else {
            Config::default()
        };

        cfg.apply_env_overrides();
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply environment variable overrides for runtime fields
    fn apply_env_overrides(&mut self) {
        use std::env;
        if let Ok(v) = env::var("KIS_DATA_DIR") { if !v.is_empty() { self.data.directory = v; } }
        if let Ok(v) = env::var("SERVER_PORT") {
            if let Ok(port) = v.parse::<u16>() { self.server.port = port; }
        }
        if let Ok(v) = env::var("AUTO_TRADE") {
            let lower = v.to_lowercase();
            if ["1","true","yes"].contains(&lower.as_str()) { self.trading.auto_trade = true; }
            if ["0","false","no"].contains(&lower.as_str()) { self.trading.auto_trade = false; }
        }
        if let Ok(v) = env::var("USE_MOCK_DATA") {
            let lower = v.to_lowercase();
            if ["1","true","yes"].contains(&lower.as_str()) { self.data.use_mock = true; }
            if ["0","false","no"].contains(&lower.as_str()) { self.data.use_mock = false; }
        }
    }

    fn validate(&self) -> Result<(), TradingError> {
        if self.trading.trend_refresh_secs == 0 {
            return Err(TradingError::ConfigError("trend_refresh_secs must be greater than 0".to_string()));
        }
        self.watch_keys().map(|_| ())
    }

    /// watch_list 항목을 TrendKey로 변환
    pub fn watch_keys(&self) -> Result<Vec<TrendKey>, TradingError> {
        self.trading.watch_list.iter()
            .map(|entry| entry.parse::<TrendKey>())
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3030,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            data: DataConfig {
                directory: "./data".to_string(),
                use_mock: true,
            },
            trading: TradingConfig {
                watch_list: vec!["AAPL:NAS".to_string(), "005930:KRX".to_string()],
                auto_trade: false,
                trend_refresh_secs: 65,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_when_file_missing() {
        let cfg = Config::load_from(Path::new("/nonexistent/config.json")).unwrap();
        assert_eq!(cfg.server.port, 3030);
        assert_eq!(cfg.watch_keys().unwrap().len(), 2);
    }

    #[test]
    fn test_default_refresh_outlasts_fetch_throttle() {
        use crate::core::trend_queue::FETCH_THROTTLE;

        let cfg = Config::default();
        assert!(cfg.trading.trend_refresh_secs > FETCH_THROTTLE.as_secs());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{
            "server": {{ "host": "0.0.0.0", "port": 8080 }},
            "logging": {{ "level": "debug" }},
            "data": {{ "directory": "/tmp/kis", "use_mock": false }},
            "trading": {{ "watch_list": ["TSLA:NAS"], "auto_trade": true, "trend_refresh_secs": 30 }}
        }}"#).unwrap();

        let cfg = Config::load_from(file.path()).unwrap();
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.trading.trend_refresh_secs, 30);

        let keys = cfg.watch_keys().unwrap();
        assert_eq!(keys[0].ticker, "TSLA");
        assert_eq!(keys[0].exchange, "NAS");
    }

    #[test]
    fn test_malformed_watch_entry_rejected() {
        let mut cfg = Config::default();
        cfg.trading.watch_list = vec!["NOEXCHANGE".to_string()];
        assert!(cfg.validate().is_err());
    }
}
