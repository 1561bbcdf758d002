//! 분석 파이프라인 오케스트레이션.
//!
//! 원시 관측 시리즈를 받아 검증 → 지표 계산 → 신호 생성 → 리스크
//! 계산 순서로 실행하고, 결과를 하나의 `AnalysisResult`로 묶습니다.
//! 어느 단계든 실패하면 즉시 에러를 반환하며 부분 결과는 없습니다.
//!
//! 파이프라인은 시계나 난수를 읽지 않으므로 같은 입력과 설정에
//! 대해 결과는 바이트 단위로 동일합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use analyzer_core::analysis_span;
use analyzer_core::config::AnalysisConfig;
use analyzer_core::domain::{Observation, SignalAction, TradingSignal};
use analyzer_core::error::AnalyzerResult;

use crate::indicators::{IndicatorEngine, IndicatorRow};
use crate::risk::{RiskCalculator, RiskMetrics};
use crate::signal::SignalGenerator;
use crate::validator::SeriesValidator;

/// 액션별 신호 개수 집계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignalCounts {
    /// 매수 신호 개수
    pub buys: usize,
    /// 매도 신호 개수
    pub sells: usize,
    /// 보류 신호 개수
    pub holds: usize,
}

/// 한 시리즈에 대한 전체 분석 결과.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 분석 대상 심볼
    pub symbol: String,
    /// 시리즈의 마지막 종가
    pub last_price: Decimal,
    /// 행 단위 지표 테이블 (입력과 1:1 정렬)
    pub rows: Vec<IndicatorRow>,
    /// 행 단위 매매 신호 (입력과 1:1 정렬)
    pub signals: Vec<TradingSignal>,
    /// 집계 리스크 지표
    pub risk: RiskMetrics,
}

impl AnalysisResult {
    /// 액션별 신호 개수를 집계합니다.
    pub fn signal_counts(&self) -> SignalCounts {
        let mut counts = SignalCounts {
            buys: 0,
            sells: 0,
            holds: 0,
        };

        for signal in &self.signals {
            match signal.action {
                SignalAction::Buy => counts.buys += 1,
                SignalAction::Sell => counts.sells += 1,
                SignalAction::Hold => counts.holds += 1,
            }
        }

        counts
    }
}

/// 분석 파이프라인.
///
/// 구성요소들은 상태가 없으므로 하나의 `Analyzer`로 여러 시리즈를
/// 순서에 상관없이 분석할 수 있습니다.
#[derive(Debug)]
pub struct Analyzer {
    config: AnalysisConfig,
    validator: SeriesValidator,
    engine: IndicatorEngine,
    generator: SignalGenerator,
    risk: RiskCalculator,
}

impl Analyzer {
    /// 주어진 설정으로 분석기를 생성합니다.
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            validator: SeriesValidator::new(),
            engine: IndicatorEngine::new(),
            generator: SignalGenerator::new(),
            risk: RiskCalculator::new(),
        }
    }

    /// 현재 설정에 대한 참조를 반환합니다.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// 원시 관측 시리즈를 분석합니다.
    ///
    /// # 인자
    /// * `symbol` - 결과에 기록될 심볼 (계산에는 영향 없음)
    /// * `observations` - 타임스탬프 오름차순의 원시 관측 시리즈
    ///
    /// # 오류
    /// 검증 실패(`InsufficientData`, `MalformedSeries`) 또는 지표/리스크
    /// 계산 오류 시 부분 결과 없이 에러를 반환합니다.
    pub fn analyze(
        &self,
        symbol: &str,
        observations: &[Observation],
    ) -> AnalyzerResult<AnalysisResult> {
        let span = analysis_span!("analyze", symbol, observations.len());
        let _guard = span.enter();

        let candles = self.validator.validate(observations, &self.config)?;
        let rows = self.engine.compute(&candles, &self.config.indicators)?;
        let signals = self.generator.generate(&rows);
        let risk = self.risk.compute(&candles, &self.config.risk)?;

        let last_price = candles[candles.len() - 1].close;

        let result = AnalysisResult {
            symbol: symbol.to_string(),
            last_price,
            rows,
            signals,
            risk,
        };

        let counts = result.signal_counts();
        info!(
            rows = result.rows.len(),
            buys = counts.buys,
            sells = counts.sells,
            holds = counts.holds,
            risk = %result.risk.summary(),
            "analysis complete"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analyzer_core::error::AnalyzerError;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn ts(i: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + i * 86_400, 0).unwrap()
    }

    fn make_observations(n: usize) -> Vec<Observation> {
        (0..n)
            .map(|i| {
                let price = Decimal::from(100 + (i as i64 * 3) % 17);
                Observation::new(
                    ts(i as i64),
                    price,
                    price + dec!(1),
                    price - dec!(1),
                    price,
                    dec!(1000),
                )
            })
            .collect()
    }

    #[test]
    fn test_analyze_full_pipeline() {
        let analyzer = Analyzer::new(AnalysisConfig::default());
        let observations = make_observations(60);

        let result = analyzer.analyze("BTC/USDT", &observations).unwrap();

        assert_eq!(result.symbol, "BTC/USDT");
        assert_eq!(result.rows.len(), 60);
        assert_eq!(result.signals.len(), 60);
        assert_eq!(result.last_price, observations[59].close.unwrap());
    }

    #[test]
    fn test_analyze_short_series_rejected() {
        let analyzer = Analyzer::new(AnalysisConfig::default());
        let observations = make_observations(10);

        let result = analyzer.analyze("BTC/USDT", &observations);
        assert!(matches!(
            result,
            Err(AnalyzerError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_signal_counts_sum_to_rows() {
        let analyzer = Analyzer::new(AnalysisConfig::default());
        let observations = make_observations(80);

        let result = analyzer.analyze("ETH/USDT", &observations).unwrap();
        let counts = result.signal_counts();

        assert_eq!(counts.buys + counts.sells + counts.holds, 80);
    }

    #[test]
    fn test_analyze_is_deterministic() {
        let analyzer = Analyzer::new(AnalysisConfig::default());
        let observations = make_observations(60);

        let a = analyzer.analyze("BTC/USDT", &observations).unwrap();
        let b = analyzer.analyze("BTC/USDT", &observations).unwrap();

        assert_eq!(a.risk, b.risk);
        assert_eq!(a.signal_counts(), b.signal_counts());
        assert_eq!(a.last_price, b.last_price);
    }
}
