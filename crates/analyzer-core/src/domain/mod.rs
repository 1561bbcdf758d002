//! 분석 엔진의 도메인 타입.

pub mod series;
pub mod signal;

pub use series::*;
pub use signal::*;
