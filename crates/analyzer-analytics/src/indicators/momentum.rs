//! 모멘텀 지표 (Momentum Indicators).
//!
//! 가격 모멘텀과 과매수/과매도 상태를 측정하는 지표를 제공합니다.
//! - RSI (Relative Strength Index, Wilder 평활)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// RSI 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RsiParams {
    /// RSI 기간 (기본: 14).
    pub period: usize,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self { period: 14 }
    }
}

/// 모멘텀 지표 계산기.
#[derive(Debug, Default)]
pub struct MomentumIndicators;

impl MomentumIndicators {
    /// 새로운 모멘텀 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// RSI (Relative Strength Index) 계산.
    ///
    /// RSI = 100 - (100 / (1 + RS)), RS = 평균 상승폭 / 평균 하락폭
    ///
    /// 상승/하락폭은 연속 종가의 차이에서 나오므로 첫 행은 정의되지
    /// 않습니다. 평균은 Wilder 평활을 사용합니다: 첫 `period`개
    /// 변화량의 단순 평균으로 시드한 뒤,
    ///
    /// ```text
    /// avg = (이전 avg × (period - 1) + 현재값) / period
    /// ```
    ///
    /// 따라서 첫 RSI 값은 행 인덱스 `period`(0-기반)에서 정의됩니다.
    ///
    /// # 엣지 케이스
    /// 평균 하락폭이 0이면 RSI = 100 (나눗셈 오류가 아님).
    ///
    /// # 반환
    /// 0-100 사이의 RSI 값들 (처음 period개는 None)
    pub fn rsi(
        &self,
        prices: &[Decimal],
        params: RsiParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: period + 1,
                provided: prices.len(),
            });
        }

        let period_decimal = Decimal::from(period);

        // 시드: 첫 period개 변화량(행 1..=period)의 단순 평균
        let mut sum_gain = Decimal::ZERO;
        let mut sum_loss = Decimal::ZERO;
        for i in 1..=period {
            let delta = prices[i] - prices[i - 1];
            if delta > Decimal::ZERO {
                sum_gain += delta;
            } else {
                sum_loss += delta.abs();
            }
        }

        let mut avg_gain = sum_gain / period_decimal;
        let mut avg_loss = sum_loss / period_decimal;

        let mut result = vec![None; period];
        result.push(Some(Self::rsi_value(avg_gain, avg_loss)));

        // Wilder 평활 재귀
        for i in period + 1..prices.len() {
            let delta = prices[i] - prices[i - 1];
            let gain = if delta > Decimal::ZERO { delta } else { Decimal::ZERO };
            let loss = if delta < Decimal::ZERO { delta.abs() } else { Decimal::ZERO };

            avg_gain = (avg_gain * (period_decimal - Decimal::ONE) + gain) / period_decimal;
            avg_loss = (avg_loss * (period_decimal - Decimal::ONE) + loss) / period_decimal;

            result.push(Some(Self::rsi_value(avg_gain, avg_loss)));
        }

        Ok(result)
    }

    /// 평균 상승/하락폭을 RSI 값으로 변환합니다.
    fn rsi_value(avg_gain: Decimal, avg_loss: Decimal) -> Decimal {
        if avg_loss == Decimal::ZERO {
            // 하락이 전혀 없으면 RSI = 100
            return dec!(100);
        }

        let rs = avg_gain / avg_loss;
        dec!(100) - (dec!(100) / (Decimal::ONE + rs))
    }
}
