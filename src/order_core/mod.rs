/**
* filename : mod
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

pub mod repository;
pub mod validator;

pub use repository::{InMemoryPositionRepository, PositionSource, TradeSink, TradingListStore};
