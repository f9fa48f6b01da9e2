/**
* filename : mod
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

pub mod csv_provider;
pub mod mock;
pub mod provider;
pub mod stream;

pub use csv_provider::CsvPriceHistoryProvider;
pub use mock::RandomWalkProvider;
pub use provider::{fetch_series, PriceHistoryProvider, SeriesInterval};
pub use stream::PriceFeed;
