//! 추세 지표 (Trend Indicators).
//!
//! 이동평균 기반의 추세 지표들을 제공합니다.
//! - SMA (Simple Moving Average)
//! - EMA (Exponential Moving Average)
//! - MACD (Moving Average Convergence Divergence)
//!
//! EMA는 재귀 평활이므로 시드가 틀리면 이후 모든 값이 오염됩니다.
//! 첫 유효 인덱스의 EMA는 같은 인덱스의 SMA와 정확히 일치해야 합니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::{IndicatorError, IndicatorResult};

/// SMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for SmaParams {
    fn default() -> Self {
        Self { period: 20 }
    }
}

/// EMA 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EmaParams {
    /// 이동평균 기간.
    pub period: usize,
}

impl Default for EmaParams {
    fn default() -> Self {
        Self { period: 12 }
    }
}

/// MACD 파라미터.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdParams {
    /// 단기 EMA 기간 (기본: 12).
    pub fast_period: usize,
    /// 장기 EMA 기간 (기본: 26).
    pub slow_period: usize,
    /// 시그널 라인 기간 (기본: 9).
    pub signal_period: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

/// MACD 결과.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MacdResult {
    /// MACD 라인 (단기 EMA - 장기 EMA).
    pub macd: Option<Decimal>,
    /// 시그널 라인 (MACD의 EMA).
    pub signal: Option<Decimal>,
    /// 히스토그램 (MACD - 시그널).
    pub histogram: Option<Decimal>,
}

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// # 반환
    /// 각 시점의 SMA 값 (처음 period-1개는 None)
    pub fn sma(
        &self,
        prices: &[Decimal],
        params: SmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
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
                result.push(None);
            } else {
                let sum: Decimal = prices[i + 1 - period..=i].iter().sum();
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 지수 이동평균 (EMA) 계산.
    ///
    /// EMA = (현재가 × k) + (이전 EMA × (1 - k)), k = 2 / (period + 1)
    ///
    /// 첫 유효 값(인덱스 period-1)은 같은 윈도우의 SMA로 시드됩니다.
    ///
    /// # 반환
    /// 각 시점의 EMA 값 (처음 period-1개는 None)
    pub fn ema(
        &self,
        prices: &[Decimal],
        params: EmaParams,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
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
        let multiplier = dec!(2) / Decimal::from(period + 1);

        for _ in 0..period - 1 {
            result.push(None);
        }

        // 시드: 첫 period개 가격의 SMA
        let initial_sma: Decimal = prices[..period].iter().sum::<Decimal>() / Decimal::from(period);
        result.push(Some(initial_sma));

        let mut prev_ema = initial_sma;
        for price in prices.iter().skip(period) {
            let ema = (*price * multiplier) + (prev_ema * (Decimal::ONE - multiplier));
            result.push(Some(ema));
            prev_ema = ema;
        }

        Ok(result)
    }

    /// MACD 계산.
    ///
    /// MACD 라인 = 단기 EMA - 장기 EMA
    /// 시그널 라인 = MACD 라인의 EMA
    /// 히스토그램 = MACD 라인 - 시그널 라인
    ///
    /// MACD 라인은 장기 EMA가 정의되는 행(slow_period - 1)부터,
    /// 시그널 라인은 그로부터 signal_period - 1행 뒤부터 정의됩니다.
    pub fn macd(&self, prices: &[Decimal], params: MacdParams) -> IndicatorResult<Vec<MacdResult>> {
        let min_required = params.slow_period + params.signal_period;

        if prices.len() < min_required {
            return Err(IndicatorError::InsufficientData {
                required: min_required,
                provided: prices.len(),
            });
        }

        let fast_ema = self.ema(
            prices,
            EmaParams {
                period: params.fast_period,
            },
        )?;
        let slow_ema = self.ema(
            prices,
            EmaParams {
                period: params.slow_period,
            },
        )?;

        let macd_line: Vec<Option<Decimal>> = fast_ema
            .iter()
            .zip(slow_ema.iter())
            .map(|pair| match pair {
                (Some(fast), Some(slow)) => Some(*fast - *slow),
                _ => None,
            })
            .collect();

        // 시그널 라인은 정의된 MACD 값만 압축한 시퀀스의 EMA
        let macd_values: Vec<Decimal> = macd_line.iter().flatten().copied().collect();
        let signal_ema = self.ema(
            &macd_values,
            EmaParams {
                period: params.signal_period,
            },
        )?;

        let mut result = Vec::with_capacity(prices.len());
        let mut signal_idx = 0;

        for macd_val in macd_line.iter() {
            if macd_val.is_some() {
                let signal = signal_ema.get(signal_idx).copied().flatten();
                let histogram = match (*macd_val, signal) {
                    (Some(m), Some(s)) => Some(m - s),
                    _ => None,
                };

                result.push(MacdResult {
                    macd: *macd_val,
                    signal,
                    histogram,
                });
                signal_idx += 1;
            } else {
                result.push(MacdResult {
                    macd: None,
                    signal: None,
                    histogram: None,
                });
            }
        }

        Ok(result)
    }

    /// 상향 교차 감지.
    ///
    /// 이전: 빠른 라인 ≤ 느린 라인, 현재: 빠른 라인 > 느린 라인.
    /// 두 행 모두에서 두 라인이 정의된 경우에만 교차가 성립합니다.
    ///
    /// # 반환
    /// 각 시점에서 상향 교차 발생 여부
    pub fn detect_bullish_cross(
        &self,
        fast: &[Option<Decimal>],
        slow: &[Option<Decimal>],
    ) -> Vec<bool> {
        let mut result = vec![false; fast.len()];

        for i in 1..fast.len().min(slow.len()) {
            if let (Some(prev_fast), Some(prev_slow), Some(curr_fast), Some(curr_slow)) = (
                fast[i - 1], slow[i - 1], fast[i], slow[i],
            ) {
                result[i] = prev_fast <= prev_slow && curr_fast > curr_slow;
            }
        }

        result
    }

    /// 하향 교차 감지.
    ///
    /// 이전: 빠른 라인 ≥ 느린 라인, 현재: 빠른 라인 < 느린 라인.
    ///
    /// # 반환
    /// 각 시점에서 하향 교차 발생 여부
    pub fn detect_bearish_cross(
        &self,
        fast: &[Option<Decimal>],
        slow: &[Option<Decimal>],
    ) -> Vec<bool> {
        let mut result = vec![false; fast.len()];

        for i in 1..fast.len().min(slow.len()) {
            if let (Some(prev_fast), Some(prev_slow), Some(curr_fast), Some(curr_slow)) = (
                fast[i - 1], slow[i - 1], fast[i], slow[i],
            ) {
                result[i] = prev_fast >= prev_slow && curr_fast < curr_slow;
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_prices() -> Vec<Decimal> {
        vec![
            dec!(100.0),
            dec!(102.0),
            dec!(101.0),
            dec!(103.0),
            dec!(105.0),
            dec!(104.0),
            dec!(106.0),
            dec!(108.0),
            dec!(107.0),
            dec!(109.0),
        ]
    }

    #[test]
    fn test_sma_basic() {
        let trend = TrendIndicators::new();
        let prices = sample_prices();

        let sma = trend.sma(&prices, SmaParams { period: 3 }).unwrap();

        // 처음 2개는 None
        assert!(sma[0].is_none());
        assert!(sma[1].is_none());

        // 3번째 값: (100 + 102 + 101) / 3 = 101
        assert_eq!(sma[2], Some(dec!(101)));
    }

    #[test]
    fn test_ema_seed_equals_sma() {
        let trend = TrendIndicators::new();
        let prices = sample_prices();

        let sma = trend.sma(&prices, SmaParams { period: 3 }).unwrap();
        let ema = trend.ema(&prices, EmaParams { period: 3 }).unwrap();

        // 첫 유효 인덱스에서 EMA == SMA (시드 불변식)
        assert!(ema[0].is_none());
        assert!(ema[1].is_none());
        assert_eq!(ema[2], sma[2]);
    }

    #[test]
    fn test_ema_recursion() {
        let trend = TrendIndicators::new();
        let prices = vec![dec!(10), dec!(20), dec!(30), dec!(40)];

        let ema = trend.ema(&prices, EmaParams { period: 2 }).unwrap();

        // 시드 = (10 + 20) / 2 = 15
        assert_eq!(ema[1], Some(dec!(15)));

        // k = 2/3: EMA[2] = 30 * 2/3 + 15 * 1/3 = 25
        let k = dec!(2) / dec!(3);
        let expected = dec!(30) * k + dec!(15) * (Decimal::ONE - k);
        assert_eq!(ema[2], Some(expected));
    }

    #[test]
    fn test_macd_definition_boundaries() {
        let trend = TrendIndicators::new();
        let prices: Vec<Decimal> = (0..50).map(|i| Decimal::from(100 + i)).collect();
        let params = MacdParams::default();

        let macd = trend.macd(&prices, params).unwrap();

        assert_eq!(macd.len(), prices.len());

        // MACD는 장기 EMA가 정의되는 인덱스 25부터
        assert!(macd[24].macd.is_none());
        assert!(macd[25].macd.is_some());
        assert!(macd[25].signal.is_none());

        // 시그널은 인덱스 25 + 9 - 1 = 33부터
        assert!(macd[32].signal.is_none());
        assert!(macd[33].signal.is_some());
        assert!(macd[33].histogram.is_some());

        // 히스토그램 = MACD - 시그널
        let m = macd[40].macd.unwrap();
        let s = macd[40].signal.unwrap();
        assert_eq!(macd[40].histogram, Some(m - s));
    }

    #[test]
    fn test_bullish_cross_detection() {
        let trend = TrendIndicators::new();

        let fast = vec![
            Some(dec!(95)),
            Some(dec!(100)), // 동률은 교차 아님
            Some(dec!(101)), // 상향 교차
            Some(dec!(103)),
        ];
        let slow = vec![
            Some(dec!(100)),
            Some(dec!(100)),
            Some(dec!(100)),
            Some(dec!(100)),
        ];

        let crosses = trend.detect_bullish_cross(&fast, &slow);

        assert!(!crosses[0]);
        assert!(!crosses[1]);
        assert!(crosses[2]);
        assert!(!crosses[3]);
    }

    #[test]
    fn test_bearish_cross_detection() {
        let trend = TrendIndicators::new();

        let fast = vec![
            Some(dec!(105)),
            Some(dec!(102)),
            Some(dec!(99)), // 하향 교차
            Some(dec!(97)),
        ];
        let slow = vec![
            Some(dec!(100)),
            Some(dec!(100)),
            Some(dec!(100)),
            Some(dec!(100)),
        ];

        let crosses = trend.detect_bearish_cross(&fast, &slow);

        assert!(!crosses[0]);
        assert!(!crosses[1]);
        assert!(crosses[2]);
        assert!(!crosses[3]);
    }

    #[test]
    fn test_cross_requires_defined_previous_row() {
        let trend = TrendIndicators::new();

        // 이전 행이 None이면 현재 행의 값이 커도 교차 아님
        let fast = vec![None, Some(dec!(101))];
        let slow = vec![None, Some(dec!(100))];

        let crosses = trend.detect_bullish_cross(&fast, &slow);
        assert!(!crosses[1]);
    }

    #[test]
    fn test_sma_insufficient_data() {
        let trend = TrendIndicators::new();
        let prices = vec![dec!(100), dec!(101)];

        let result = trend.sma(&prices, SmaParams { period: 20 });
        assert!(matches!(
            result,
            Err(IndicatorError::InsufficientData {
                required: 20,
                provided: 2
            })
        ));
    }
}
