//! 시장 분석 엔진.
//!
//! 이 크레이트는 검증된 가격/거래량 시계열에서 파생 결과를 계산합니다:
//! - 입력 시리즈 검증 (길이, 단조성, 누락 종가)
//! - 기술적 지표 (이동평균, MACD, RSI, 볼린저 밴드, 거래량 비율)
//! - 규칙 기반 매매 신호
//! - 리스크 지표 (변동성, 샤프 비율, 최대 낙폭, VaR/CVaR)
//!
//! 데이터는 한 방향으로만 흐릅니다:
//! 원시 시리즈 → 검증된 시리즈 → 지표 테이블 → 신호 / 리스크 지표 →
//! 분석 결과. 어떤 구성요소도 다른 구성요소의 출력을 제자리에서
//! 수정하지 않습니다.
//!
//! # Re-exports
//!
//! - [`indicators`]: 지표 계산 (IndicatorEngine, IndicatorRow 등)
//! - [`signal`]: 신호 생성 (SignalGenerator)
//! - [`risk`]: 리스크 지표 (RiskCalculator, RiskMetrics)
//! - [`analyzer`]: 오케스트레이션 (Analyzer, AnalysisResult)

pub mod analyzer;
pub mod indicators;
pub mod risk;
pub mod signal;
pub mod validator;

// Indicators 모듈 re-exports
pub use indicators::{
    BollingerBandsParams,
    BollingerBandsResult,
    EmaParams,
    IndicatorEngine,
    IndicatorError,
    IndicatorResult,
    IndicatorRow,
    MacdParams,
    MacdResult,
    MomentumIndicators,
    SmaParams,
    TrendIndicators,
    VolatilityIndicators,
    VolumeIndicators,
    VolumeSmaParams,
};

// Validator re-export
pub use validator::SeriesValidator;

// Signal 모듈 re-export
pub use signal::{SignalGenerator, RSI_OVERBOUGHT, RSI_OVERSOLD};

// Risk 모듈 re-export
pub use risk::{RiskCalculator, RiskMetrics};

// Analyzer re-export
pub use analyzer::{Analyzer, AnalysisResult, SignalCounts};
