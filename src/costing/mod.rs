//! 견적(BOQ) 계산 모듈 모음.

pub mod estimate;
pub mod rates;

pub use estimate::*;
pub use rates::{CostRateTable, RateTableError};
