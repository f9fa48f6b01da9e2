use std::path::{Path, PathBuf};
use async_trait::async_trait;

use crate::error::TradingError;
use crate::market_data::provider::{PriceHistoryProvider, SeriesInterval};
use crate::models::market_data::PricePoint;

/// `<root>/<exchange>/<ticker>_<daily|minute>.csv` 파일을 읽는 시세 제공자
pub struct CsvPriceHistoryProvider {
    root: PathBuf,
    delimiter: u8,
}

impl CsvPriceHistoryProvider {
    pub fn new(root: impl Into<PathBuf>, delimiter: char) -> Self {
        Self { root: root.into(), delimiter: delimiter as u8 }
    }

    pub fn series_path(&self, ticker: &str, exchange: &str, interval: SeriesInterval) -> PathBuf {
        self.root
            .join(exchange)
            .join(format!("{}_{}.csv", ticker, interval.file_suffix()))
    }

    fn load(&self, path: &Path) -> Result<Vec<PricePoint>, TradingError> {
        if !path.exists() {
            return Err(TradingError::DataNotFound(path.display().to_string()));
        }

        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)?;

        let mut points = Vec::new();
        for rec in rdr.deserialize() {
            let row: CsvRow = rec.map_err(|e| TradingError::ParseError(e.to_string()))?;
            points.push(PricePoint {
                date: row.date,
                time: row.time.filter(|t| !t.is_empty()),
                close: row.close,
            });
        }

        // 파일 내 정렬 순서와 무관하게 최신순으로 맞춤
        points.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
        Ok(points)
    }
}

#[async_trait]
impl PriceHistoryProvider for CsvPriceHistoryProvider {
    async fn fetch_daily_series(&self, ticker: &str, exchange: &str) -> Result<Vec<PricePoint>, TradingError> {
        let path = self.series_path(ticker, exchange, SeriesInterval::Daily);
        self.load(&path)
    }

    async fn fetch_minute_series(&self, ticker: &str, exchange: &str) -> Result<Vec<PricePoint>, TradingError> {
        let path = self.series_path(ticker, exchange, SeriesInterval::Minute);
        self.load(&path)
    }
}

#[derive(serde::Deserialize)]
struct CsvRow {
    date: String,
    #[serde(default)]
    time: Option<String>,
    close: String,
}
