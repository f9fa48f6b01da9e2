/**
* filename : mod
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

pub mod market_data;
pub mod position;
pub mod trade;
pub mod trend;
