//! 전역방출 소화약제 산출 모듈 모음.

pub mod flooding;
pub mod params;

pub use flooding::*;
pub use params::SizingParams;
