//! 변동성 지표 (Volatility Indicators).
//!
//! 가격 변동성을 측정하는 지표를 제공합니다.
//! - Bollinger Bands (볼린저 밴드)

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// 볼린저 밴드 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsParams {
    /// 이동평균 기간 (기본: 20).
    pub period: usize,
    /// 표준편차 배수 (기본: 2).
    pub std_dev_multiplier: Decimal,
}

impl Default for BollingerBandsParams {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev_multiplier: dec!(2),
        }
    }
}

/// 볼린저 밴드 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerBandsResult {
    /// 상단 밴드 (MA + k × σ).
    pub upper: Option<Decimal>,
    /// 중간 밴드 (이동평균).
    pub middle: Option<Decimal>,
    /// 하단 밴드 (MA - k × σ).
    pub lower: Option<Decimal>,
}

/// 변동성 지표 계산기.
#[derive(Debug, Default)]
pub struct VolatilityIndicators;

impl VolatilityIndicators {
    /// 새로운 변동성 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 볼린저 밴드 계산.
    ///
    /// 상단 밴드 = MA + (k × σ)
    /// 중간 밴드 = MA (이동평균)
    /// 하단 밴드 = MA - (k × σ)
    ///
    /// σ는 같은 윈도우에 대한 모집단 표준편차입니다.
    /// σ ≥ 0이므로 모든 정의된 행에서 상단 ≥ 중간 ≥ 하단입니다.
    ///
    /// # 반환
    /// 상단, 중간, 하단 밴드 값들 (처음 period-1개는 None)
    pub fn bollinger_bands(
        &self,
        prices: &[Decimal],
        params: BollingerBandsParams,
    ) -> IndicatorResult<Vec<BollingerBandsResult>> {
        let period = params.period;

        if period == 0 {
            return Err(IndicatorError::InvalidParameter(
                "기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if prices.len() < period {
            return Err(IndicatorError::InsufficientData {
                required: period,
                provided: prices.len(),
            });
        }

        let mut result = Vec::with_capacity(prices.len());
        let period_decimal = Decimal::from(period);

        for i in 0..prices.len() {
            if i < period - 1 {
                result.push(BollingerBandsResult {
                    upper: None,
                    middle: None,
                    lower: None,
                });
            } else {
                let window = &prices[i + 1 - period..=i];

                let sum: Decimal = window.iter().sum();
                let ma = sum / period_decimal;

                // 모집단 분산 (n으로 나눔)
                let variance: Decimal = window
                    .iter()
                    .map(|&p| {
                        let diff = p - ma;
                        diff * diff
                    })
                    .sum::<Decimal>()
                    / period_decimal;

                let std_dev = self.sqrt_decimal(variance);
                let deviation = params.std_dev_multiplier * std_dev;

                result.push(BollingerBandsResult {
                    upper: Some(ma + deviation),
                    middle: Some(ma),
                    lower: Some(ma - deviation),
                });
            }
        }

        Ok(result)
    }

    /// Decimal 제곱근을 뉴턴-랩슨 방법으로 계산합니다.
    fn sqrt_decimal(&self, value: Decimal) -> Decimal {
        if value <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let mut guess = value / Decimal::TWO;
        if guess.is_zero() {
            guess = value;
        }
        let precision = Decimal::new(1, 10); // 0.0000000001

        for _ in 0..50 {
            let next_guess = (guess + value / guess) / Decimal::TWO;
            if (next_guess - guess).abs() < precision {
                return next_guess;
            }
            guess = next_guess;
        }

        guess
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_bollinger_band_ordering() {
        let volatility = VolatilityIndicators::new();
        let prices: Vec<Decimal> = (0..30).map(|i| Decimal::from(100 + (i % 5))).collect();

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        assert_eq!(bands.len(), prices.len());

        // 처음 19개는 None
        assert!(bands[18].middle.is_none());
        assert!(bands[19].middle.is_some());

        // 정의된 모든 행에서 상단 ≥ 중간 ≥ 하단
        for b in bands.iter().skip(19) {
            let upper = b.upper.unwrap();
            let middle = b.middle.unwrap();
            let lower = b.lower.unwrap();
            assert!(upper >= middle);
            assert!(middle >= lower);
        }
    }

    #[test]
    fn test_bollinger_flat_series_collapses() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(100); 25];

        let bands = volatility
            .bollinger_bands(&prices, BollingerBandsParams::default())
            .unwrap();

        // 변동성이 없으면 세 밴드가 모두 이동평균과 같음
        let b = &bands[20];
        assert_eq!(b.upper, Some(dec!(100)));
        assert_eq!(b.middle, Some(dec!(100)));
        assert_eq!(b.lower, Some(dec!(100)));
    }

    #[test]
    fn test_bollinger_middle_is_sma() {
        let volatility = VolatilityIndicators::new();
        let prices: Vec<Decimal> = (1..=20).map(Decimal::from).collect();

        let bands = volatility
            .bollinger_bands(
                &prices,
                BollingerBandsParams {
                    period: 20,
                    std_dev_multiplier: dec!(2),
                },
            )
            .unwrap();

        // 중간 밴드 = SMA(20) = (1 + ... + 20) / 20 = 10.5
        assert_eq!(bands[19].middle, Some(dec!(10.5)));
    }

    #[test]
    fn test_bollinger_insufficient_data() {
        let volatility = VolatilityIndicators::new();
        let prices = vec![dec!(100), dec!(101), dec!(102)];

        let result = volatility.bollinger_bands(&prices, BollingerBandsParams::default());
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_sqrt_decimal() {
        let volatility = VolatilityIndicators::new();

        let sqrt_4 = volatility.sqrt_decimal(dec!(4));
        assert!((sqrt_4 - dec!(2)).abs() < dec!(0.0001));

        let sqrt_2 = volatility.sqrt_decimal(dec!(2));
        assert!((sqrt_2 - dec!(1.4142)).abs() < dec!(0.001));

        assert_eq!(volatility.sqrt_decimal(Decimal::ZERO), Decimal::ZERO);
    }
}
