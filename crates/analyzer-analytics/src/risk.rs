//! 리스크 지표 계산 모듈.
//!
//! 수익률 시리즈에 대한 집계 통계를 제공합니다:
//! - 연율화 변동성 (Volatility)
//! - 샤프 비율 (Sharpe Ratio)
//! - 최대 낙폭 (Maximum Drawdown)
//! - VaR / CVaR (역사적 분포 기반 꼬리 손실)
//! - 총 수익률 (Total Return)
//!
//! 모든 지표는 수익률 시리즈의 순수 함수이며 가변 상태가 없습니다.
//!
//! # 부호 규약
//!
//! VaR/CVaR는 **부호 있는 수익률**로 보고합니다. 음수가 손실입니다
//! (손실 크기를 양수로 보고하지 않습니다). 최대 낙폭도 같은 규약으로
//! 0 이하의 값입니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use analyzer_core::config::RiskConfig;
use analyzer_core::domain::Candle;
use analyzer_core::error::{AnalyzerError, AnalyzerResult};

/// 관측 윈도우에 대한 집계 리스크 지표.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// 연율화 변동성 (수익률 표본 표준편차 × √연간 기간 수)
    pub volatility: Decimal,
    /// 샤프 비율 (변동성 0이면 0으로 보고)
    pub sharpe_ratio: Decimal,
    /// 최대 낙폭 (부호 있는 비율, 0 이하)
    pub max_drawdown: Decimal,
    /// VaR (설정된 신뢰수준의 역사적 분위수, 부호 있는 수익률)
    pub value_at_risk: Decimal,
    /// CVaR (VaR 이하 수익률의 평균, 부호 있는 수익률)
    pub cvar: Decimal,
    /// 총 수익률 (마지막 종가 / 첫 종가 - 1)
    pub total_return: Decimal,
}

impl RiskMetrics {
    /// 로그 출력용 한 줄 요약을 반환합니다.
    pub fn summary(&self) -> String {
        format!(
            "변동성: {:.4} | 샤프: {:.4} | MDD: {:.4} | VaR: {:.4} | CVaR: {:.4} | 총수익: {:.4}",
            self.volatility,
            self.sharpe_ratio,
            self.max_drawdown,
            self.value_at_risk,
            self.cvar,
            self.total_return
        )
    }
}

/// 리스크 지표 계산기.
#[derive(Debug, Default)]
pub struct RiskCalculator;

impl RiskCalculator {
    /// 새로운 리스크 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 검증된 캔들 시리즈에서 리스크 지표를 계산합니다.
    ///
    /// 수익률에는 최소 2개의 관측값이 필요합니다.
    pub fn compute(&self, candles: &[Candle], config: &RiskConfig) -> AnalyzerResult<RiskMetrics> {
        if candles.len() < 2 {
            return Err(AnalyzerError::InsufficientData {
                required: 2,
                provided: candles.len(),
            });
        }

        let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
        let returns = Self::simple_returns(&closes)?;

        let periods = Decimal::from(config.periods_per_year);
        let sqrt_periods = Self::decimal_sqrt(periods);

        let mean = returns.iter().copied().sum::<Decimal>() / Decimal::from(returns.len());
        let std_dev = Self::sample_std_dev(&returns, mean);

        let volatility = std_dev * sqrt_periods;

        // 변동성이 0이면 샤프 비율은 0으로 보고 (나눗셈 오류가 아님)
        let sharpe_ratio = if std_dev.is_zero() {
            Decimal::ZERO
        } else {
            (mean * periods - config.risk_free_rate) / (std_dev * sqrt_periods)
        };

        let max_drawdown = Self::max_drawdown(&closes);

        let tail_quantile = Decimal::ONE - config.confidence_level;
        let value_at_risk = Self::percentile(&returns, tail_quantile);
        let cvar = Self::cvar_below(&returns, value_at_risk);

        // 첫 종가가 0이 아님은 simple_returns에서 이미 보장됨
        let total_return = closes[closes.len() - 1] / closes[0] - Decimal::ONE;

        Ok(RiskMetrics {
            volatility,
            sharpe_ratio,
            max_drawdown,
            value_at_risk,
            cvar,
            total_return,
        })
    }

    /// 단순 수익률 계산: r[t] = close[t] / close[t-1] - 1.
    fn simple_returns(closes: &[Decimal]) -> AnalyzerResult<Vec<Decimal>> {
        let mut returns = Vec::with_capacity(closes.len() - 1);

        for pair in closes.windows(2) {
            if pair[0].is_zero() {
                return Err(AnalyzerError::MalformedSeries(
                    "종가가 0이면 수익률이 정의되지 않습니다".to_string(),
                ));
            }
            returns.push(pair[1] / pair[0] - Decimal::ONE);
        }

        Ok(returns)
    }

    /// 표본 표준편차 (n-1로 나눔). 표본이 1개면 0.
    fn sample_std_dev(returns: &[Decimal], mean: Decimal) -> Decimal {
        if returns.len() < 2 {
            return Decimal::ZERO;
        }

        let variance = returns
            .iter()
            .map(|r| {
                let diff = *r - mean;
                diff * diff
            })
            .sum::<Decimal>()
            / Decimal::from(returns.len() - 1);

        Self::decimal_sqrt(variance)
    }

    /// 종가 시리즈에서 최대 낙폭을 계산합니다.
    ///
    /// 누적 수익률 곡선은 종가를 첫 종가로 나눈 것이므로, 종가 기준
    /// 계산과 결과가 같습니다. 낙폭은 고점 대비 부호 있는 비율이며,
    /// 이후 회복은 반영되지 않습니다.
    fn max_drawdown(closes: &[Decimal]) -> Decimal {
        let mut max_dd = Decimal::ZERO;
        let mut peak = Decimal::ZERO;

        for &close in closes {
            if close > peak {
                peak = close;
            }

            // 고점이 0이면 낙폭이 정의되지 않음 (0 나눗셈 엣지)
            if peak > Decimal::ZERO {
                let drawdown = (close - peak) / peak;
                if drawdown < max_dd {
                    max_dd = drawdown;
                }
            }
        }

        max_dd
    }

    /// 역사적 분위수 (선형 보간).
    ///
    /// 정렬된 수익률에서 rank = q × (n - 1) 위치를 이웃 값 사이에서
    /// 선형 보간합니다.
    fn percentile(returns: &[Decimal], q: Decimal) -> Decimal {
        let mut sorted = returns.to_vec();
        sorted.sort();

        let n = sorted.len();
        if n == 1 {
            return sorted[0];
        }

        let rank = q * Decimal::from(n - 1);
        let lower = rank.floor();
        let idx = lower.to_usize().unwrap_or(0).min(n - 1);

        if idx + 1 >= n {
            return sorted[n - 1];
        }

        let fraction = rank - lower;
        sorted[idx] + fraction * (sorted[idx + 1] - sorted[idx])
    }

    /// VaR 이하 수익률의 평균 (CVaR).
    ///
    /// 임계값 이하의 수익률이 없으면 VaR 자체를 반환합니다.
    fn cvar_below(returns: &[Decimal], threshold: Decimal) -> Decimal {
        let tail: Vec<Decimal> = returns.iter().copied().filter(|r| *r <= threshold).collect();

        if tail.is_empty() {
            return threshold;
        }

        tail.iter().copied().sum::<Decimal>() / Decimal::from(tail.len())
    }

    /// Decimal 타입의 제곱근을 뉴턴-랩슨 방법으로 계산합니다.
    fn decimal_sqrt(value: Decimal) -> Decimal {
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
