//! 설정 관리.
//!
//! 이 모듈은 분석 엔진의 설정을 정의하고 관리합니다.
//! 모든 수치 상수(지표 기간, 무위험 이자율, 연간 거래 기간 수,
//! VaR 신뢰수준)는 전역 상태가 아니라 명시적 설정 구조체로 전달되므로,
//! 서로 다른 파라미터의 분석을 동시에 실행해도 간섭이 없습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalyzerError, AnalyzerResult};

/// 분석 엔진 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// 지표 계산 설정
    #[serde(default)]
    pub indicators: IndicatorConfig,
    /// 리스크 지표 설정
    #[serde(default)]
    pub risk: RiskConfig,
    /// 입력 시리즈 검증 설정
    #[serde(default)]
    pub validation: ValidationConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// 지표 계산 설정.
///
/// 모든 윈도우 길이는 공식을 바꾸지 않고 조정할 수 있습니다.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndicatorConfig {
    /// 단기 SMA 기간 (기본: 20)
    #[serde(default = "default_sma_short")]
    pub sma_short: usize,
    /// 장기 SMA 기간 (기본: 50)
    #[serde(default = "default_sma_long")]
    pub sma_long: usize,
    /// 단기 EMA 기간 (기본: 12)
    #[serde(default = "default_ema_fast")]
    pub ema_fast: usize,
    /// 장기 EMA 기간 (기본: 26)
    #[serde(default = "default_ema_slow")]
    pub ema_slow: usize,
    /// MACD 시그널 라인 기간 (기본: 9)
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,
    /// RSI 기간 (기본: 14)
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,
    /// 볼린저 밴드 기간 (기본: 20)
    #[serde(default = "default_bollinger_period")]
    pub bollinger_period: usize,
    /// 볼린저 밴드 표준편차 배수 (기본: 2)
    #[serde(default = "default_bollinger_multiplier")]
    pub bollinger_multiplier: Decimal,
    /// 거래량 이동평균 기간 (기본: 20)
    #[serde(default = "default_volume_period")]
    pub volume_period: usize,
}

fn default_sma_short() -> usize {
    20
}
fn default_sma_long() -> usize {
    50
}
fn default_ema_fast() -> usize {
    12
}
fn default_ema_slow() -> usize {
    26
}
fn default_macd_signal() -> usize {
    9
}
fn default_rsi_period() -> usize {
    14
}
fn default_bollinger_period() -> usize {
    20
}
fn default_bollinger_multiplier() -> Decimal {
    Decimal::TWO
}
fn default_volume_period() -> usize {
    20
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_short: default_sma_short(),
            sma_long: default_sma_long(),
            ema_fast: default_ema_fast(),
            ema_slow: default_ema_slow(),
            macd_signal: default_macd_signal(),
            rsi_period: default_rsi_period(),
            bollinger_period: default_bollinger_period(),
            bollinger_multiplier: default_bollinger_multiplier(),
            volume_period: default_volume_period(),
        }
    }
}

impl IndicatorConfig {
    /// 설정된 지표 중 가장 긴 룩백 윈도우를 반환합니다.
    ///
    /// 검증 단계의 최소 시리즈 길이로 사용됩니다.
    /// RSI와 MACD 시그널은 윈도우 시작에 추가 행이 필요하므로
    /// +1 형태로 반영됩니다.
    pub fn max_lookback(&self) -> usize {
        [
            self.sma_short,
            self.sma_long,
            self.ema_fast,
            self.ema_slow,
            self.ema_slow + self.macd_signal,
            self.rsi_period + 1,
            self.bollinger_period,
            self.volume_period,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// 모든 기간이 0보다 큰지 확인합니다.
    pub fn validate(&self) -> AnalyzerResult<()> {
        let periods = [
            self.sma_short,
            self.sma_long,
            self.ema_fast,
            self.ema_slow,
            self.macd_signal,
            self.rsi_period,
            self.bollinger_period,
            self.volume_period,
        ];

        if periods.iter().any(|&p| p == 0) {
            return Err(AnalyzerError::InvalidParameter(
                "지표 기간은 0보다 커야 합니다".to_string(),
            ));
        }

        if self.ema_fast >= self.ema_slow {
            return Err(AnalyzerError::InvalidParameter(
                "단기 EMA 기간은 장기 EMA 기간보다 짧아야 합니다".to_string(),
            ));
        }

        if self.bollinger_multiplier <= Decimal::ZERO {
            return Err(AnalyzerError::InvalidParameter(
                "볼린저 밴드 배수는 0보다 커야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

/// 리스크 지표 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskConfig {
    /// 연간 무위험 이자율 (예: 0.02 = 2%)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: Decimal,
    /// 연간 거래 기간 수 (암호화폐: 365, 주식: 252)
    #[serde(default = "default_periods_per_year")]
    pub periods_per_year: u32,
    /// VaR/CVaR 신뢰수준 (기본: 0.95)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: Decimal,
}

fn default_risk_free_rate() -> Decimal {
    Decimal::new(2, 2) // 0.02
}
fn default_periods_per_year() -> u32 {
    365
}
fn default_confidence_level() -> Decimal {
    Decimal::new(95, 2) // 0.95
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            periods_per_year: default_periods_per_year(),
            confidence_level: default_confidence_level(),
        }
    }
}

impl RiskConfig {
    /// 신뢰수준이 (0, 1) 구간에 있는지 확인합니다.
    pub fn validate(&self) -> AnalyzerResult<()> {
        if self.confidence_level <= Decimal::ZERO || self.confidence_level >= Decimal::ONE {
            return Err(AnalyzerError::InvalidParameter(
                "신뢰수준은 0과 1 사이여야 합니다".to_string(),
            ));
        }

        if self.periods_per_year == 0 {
            return Err(AnalyzerError::InvalidParameter(
                "연간 거래 기간 수는 0보다 커야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

/// 입력 시리즈 검증 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// 허용되는 종가 누락 비율 (기본: 0.1 = 10%)
    ///
    /// 이 비율을 초과하면 시리즈 전체가 거부됩니다.
    /// 이하이면 직전 종가로 채우고 경고를 남깁니다.
    #[serde(default = "default_max_missing_ratio")]
    pub max_missing_ratio: Decimal,
}

fn default_max_missing_ratio() -> Decimal {
    Decimal::new(1, 1) // 0.1
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_missing_ratio: default_max_missing_ratio(),
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl AnalysisConfig {
    /// TOML 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 환경 변수는 `ANALYZER_` 접두사를 사용하며 파일 값을 덮어씁니다.
    /// 예: `ANALYZER_RISK__PERIODS_PER_YEAR=252`
    pub fn from_file(path: impl AsRef<Path>) -> AnalyzerResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("ANALYZER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AnalyzerError::Config(e.to_string()))?;

        let cfg: Self = settings
            .try_deserialize()
            .map_err(|e| AnalyzerError::Config(e.to_string()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// 모든 하위 설정을 검증합니다.
    pub fn validate(&self) -> AnalyzerResult<()> {
        self.indicators.validate()?;
        self.risk.validate()?;

        if self.validation.max_missing_ratio < Decimal::ZERO
            || self.validation.max_missing_ratio >= Decimal::ONE
        {
            return Err(AnalyzerError::InvalidParameter(
                "누락 허용 비율은 [0, 1) 구간이어야 합니다".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();

        assert_eq!(config.indicators.sma_short, 20);
        assert_eq!(config.indicators.sma_long, 50);
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.risk.periods_per_year, 365);
        assert_eq!(config.risk.confidence_level, dec!(0.95));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_max_lookback() {
        let config = IndicatorConfig::default();

        // 기본 설정에서 가장 긴 윈도우는 SMA(50)
        assert_eq!(config.max_lookback(), 50);

        // MACD 의존성이 더 길어지면 그쪽이 기준
        let config = IndicatorConfig {
            sma_long: 30,
            ema_slow: 40,
            macd_signal: 15,
            ..IndicatorConfig::default()
        };
        assert_eq!(config.max_lookback(), 55);
    }

    #[test]
    fn test_invalid_period_rejected() {
        let config = IndicatorConfig {
            rsi_period: 0,
            ..IndicatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_ema_ordering_rejected() {
        let config = IndicatorConfig {
            ema_fast: 26,
            ema_slow: 12,
            ..IndicatorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_confidence_rejected() {
        let config = RiskConfig {
            confidence_level: dec!(1.5),
            ..RiskConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_str = r#"
            [indicators]
            sma_short = 10
            sma_long = 30

            [risk]
            periods_per_year = 252
        "#;

        let config: AnalysisConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.indicators.sma_short, 10);
        assert_eq!(config.indicators.sma_long, 30);
        // 생략된 필드는 기본값
        assert_eq!(config.indicators.rsi_period, 14);
        assert_eq!(config.risk.periods_per_year, 252);
        assert_eq!(config.risk.confidence_level, dec!(0.95));
    }
}
