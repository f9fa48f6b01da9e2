/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description:
**/
pub mod moving_averages;
pub mod trend;
pub mod classifier;

pub use moving_averages::*;
pub use trend::*;
pub use classifier::*;
