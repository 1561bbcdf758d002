//! 가격/거래량 시계열 타입.
//!
//! 이 모듈은 시계열 관련 타입을 정의합니다:
//! - `Observation` - 수집 단계에서 전달되는 원시 OHLCV 행
//! - `Candle` - 검증을 통과한 OHLCV 캔들
//!
//! 원시 관측값의 종가는 `Option`입니다. 수집기가 전달한 NaN/누락
//! 값은 `Decimal`로 표현할 수 없으므로 경계에서 `None`이 됩니다.
//! 검증 단계를 통과한 `Candle`은 종가가 항상 존재합니다.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 원시 OHLCV 관측값.
///
/// 데이터 수집 협력자가 전달하는 한 행입니다. 검증 전이므로
/// 종가 누락이 허용됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    /// 관측 시각
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가 (수집 단계에서 누락될 수 있음)
    pub close: Option<Decimal>,
    /// 거래량
    pub volume: Decimal,
}

impl Observation {
    /// 새 관측값을 생성합니다.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close: Some(close),
            volume,
        }
    }

    /// 종가가 누락된 관측값을 생성합니다.
    pub fn with_missing_close(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close: None,
            volume,
        }
    }

    /// 음수 필드가 있는지 확인합니다.
    pub fn has_negative_field(&self) -> bool {
        self.open < Decimal::ZERO
            || self.high < Decimal::ZERO
            || self.low < Decimal::ZERO
            || self.volume < Decimal::ZERO
            || self.close.is_some_and(|c| c < Decimal::ZERO)
    }
}

/// 검증된 OHLCV 캔들.
///
/// `Observation`과 동일하지만 종가가 항상 존재합니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// 캔들 시각
    pub timestamp: DateTime<Utc>,
    /// 시가
    pub open: Decimal,
    /// 고가
    pub high: Decimal,
    /// 저가
    pub low: Decimal,
    /// 종가
    pub close: Decimal,
    /// 거래량
    pub volume: Decimal,
}

impl Candle {
    /// 새 캔들을 생성합니다.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// 양봉(종가 > 시가)인지 확인합니다.
    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    /// 음봉(종가 < 시가)인지 확인합니다.
    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// 캔들 범위(고가 - 저가)를 반환합니다.
    pub fn range(&self) -> Decimal {
        self.high - self.low
    }
}
