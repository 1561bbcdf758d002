//! 거래량 기반 지표 (Volume-Based Indicators).
//!
//! 거래량 이동평균과 거래량 비율을 제공합니다.
//!
//! 거래량 비율 = 현재 거래량 / 거래량 SMA.
//! 평균 대비 거래량이 얼마나 몰렸는지를 나타내며, 1보다 크면
//! 평균 이상의 거래가 일어난 행입니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 거래량 SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VolumeSmaParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
}

impl Default for VolumeSmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// 거래량 지표 계산기.
#[derive(Debug, Default)]
pub struct VolumeIndicators;

impl VolumeIndicators {
    /// 새로운 거래량 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 거래량 SMA와 거래량 비율을 함께 계산합니다.
    ///
    /// 비율은 거래량 SMA가 정의되지 않았거나 0이면 `None`입니다
    /// (0으로 나누지 않음).
    ///
    /// # 반환
    /// (거래량 SMA 벡터, 거래량 비율 벡터) — 둘 다 입력과 같은 길이
    #[allow(clippy::type_complexity)]
    pub fn volume_sma_and_ratio(
        &self,
        volumes: &[Decimal],
        params: VolumeSmaParams,
    ) -> IndicatorResult<(Vec<Option<Decimal>>, Vec<Option<Decimal>>)> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if volumes.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: volumes.len(),
            });
        }

        let period_decimal = Decimal::from(period);
        let mut sma = Vec::with_capacity(volumes.len());
        let mut ratio = Vec::with_capacity(volumes.len());

        for i in 0..volumes.len() {
            if i < period - 1 {
                sma.push(None);
                ratio.push(None);
            } else {
                let sum: Decimal = volumes[i + 1 - period..=i].iter().sum();
                let avg = sum / period_decimal;

                if avg.is_zero() {
                    sma.push(Some(avg));
                    ratio.push(None);
                } else {
                    sma.push(Some(avg));
                    ratio.push(Some(volumes[i] / avg));
                }
            }
        }

        Ok((sma, ratio))
    }
}
