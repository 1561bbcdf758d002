//! 기술적 지표 모듈.
//!
//! 이 모듈은 검증된 캔들 시리즈에서 파생 지표 테이블을 계산합니다.
//!
//! # 지원 지표
//!
//! ## 추세 지표 (Trend Indicators)
//! - **SMA**: 단순 이동평균 (Simple Moving Average)
//! - **EMA**: 지수 이동평균 (Exponential Moving Average)
//! - **MACD**: 이동평균 수렴/확산 (Moving Average Convergence Divergence)
//!
//! ## 모멘텀 지표 (Momentum Indicators)
//! - **RSI**: 상대강도지수 (Relative Strength Index, Wilder 평활)
//!
//! ## 변동성 지표 (Volatility Indicators)
//! - **Bollinger Bands**: 볼린저 밴드
//!
//! ## 거래량 지표 (Volume Indicators)
//! - **Volume SMA / Volume Ratio**: 거래량 이동평균과 비율
//!
//! # 공통 불변식
//!
//! 윈도우 지표 값은 0-기반 행 인덱스 `period - 1`부터 정의되며,
//! 정확히 해당 트레일링 윈도우의 결정적 함수입니다 (look-ahead 없음).
//! 윈도우가 채워지기 전의 값은 0이 아니라 `None`입니다.

pub mod momentum;
pub mod trend;
pub mod volatility;
pub mod volume;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use analyzer_core::config::IndicatorConfig;
use analyzer_core::domain::Candle;
use analyzer_core::error::AnalyzerError;

pub use momentum::{MomentumIndicators, RsiParams};
pub use trend::{EmaParams, MacdParams, MacdResult, SmaParams, TrendIndicators};
pub use volatility::{BollingerBandsParams, BollingerBandsResult, VolatilityIndicators};
pub use volume::{VolumeIndicators, VolumeSmaParams};

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 데이터 부족 오류
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;

impl From<IndicatorError> for AnalyzerError {
    fn from(err: IndicatorError) -> Self {
        match err {
            IndicatorError::InsufficientData { required, provided } => {
                AnalyzerError::InsufficientData { required, provided }
            }
            IndicatorError::InvalidParameter(msg) => AnalyzerError::InvalidParameter(msg),
        }
    }
}

/// 캔들과 타임스탬프로 1:1 정렬된 파생 지표 행.
///
/// 모든 윈도우 필드는 윈도우가 채워지기 전까지 `None`입니다.
/// 0으로 대체하면 하류 신호 로직이 오염되므로 절대 기본값을
/// 넣지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorRow {
    /// 행 시각 (입력 캔들과 동일)
    pub timestamp: DateTime<Utc>,
    /// 종가 (신호 규칙의 밴드 비교에 사용)
    pub close: Decimal,
    /// 단기 SMA
    pub sma_short: Option<Decimal>,
    /// 장기 SMA
    pub sma_long: Option<Decimal>,
    /// 단기 EMA
    pub ema_fast: Option<Decimal>,
    /// 장기 EMA
    pub ema_slow: Option<Decimal>,
    /// MACD 라인 (단기 EMA - 장기 EMA)
    pub macd: Option<Decimal>,
    /// MACD 시그널 라인
    pub macd_signal: Option<Decimal>,
    /// MACD 히스토그램
    pub macd_histogram: Option<Decimal>,
    /// RSI
    pub rsi: Option<Decimal>,
    /// 볼린저 상단 밴드
    pub bb_upper: Option<Decimal>,
    /// 볼린저 중간 밴드
    pub bb_middle: Option<Decimal>,
    /// 볼린저 하단 밴드
    pub bb_lower: Option<Decimal>,
    /// 거래량 SMA
    pub volume_sma: Option<Decimal>,
    /// 거래량 비율 (현재 거래량 / 거래량 SMA)
    pub volume_ratio: Option<Decimal>,
}

/// 통합 지표 엔진.
///
/// 모든 기술적 지표 계산을 위한 통합 인터페이스를 제공합니다.
/// 순수 함수이며 I/O가 없습니다.
#[derive(Debug, Default)]
pub struct IndicatorEngine {
    trend: TrendIndicators,
    momentum: MomentumIndicators,
    volatility: VolatilityIndicators,
    volume: VolumeIndicators,
}

impl IndicatorEngine {
    /// 새로운 지표 엔진 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 검증된 캔들 시리즈에서 전체 지표 테이블을 계산합니다.
    ///
    /// # 인자
    /// * `candles` - 검증된 캔들 시리즈
    /// * `config` - 지표 기간 설정
    ///
    /// # 반환
    /// 입력과 같은 길이의 지표 행 벡터 (타임스탬프로 1:1 정렬)
    pub fn compute(
        &self,
        candles: &[Candle],
        config: &IndicatorConfig,
    ) -> IndicatorResult<Vec<IndicatorRow>> {
        let closes: Vec<Decimal> = candles.iter().map(|c| c.close).collect();
        let volumes: Vec<Decimal> = candles.iter().map(|c| c.volume).collect();

        let sma_short = self.trend.sma(
            &closes,
            SmaParams {
                period: config.sma_short,
            },
        )?;
        let sma_long = self.trend.sma(
            &closes,
            SmaParams {
                period: config.sma_long,
            },
        )?;
        let ema_fast = self.trend.ema(
            &closes,
            EmaParams {
                period: config.ema_fast,
            },
        )?;
        let ema_slow = self.trend.ema(
            &closes,
            EmaParams {
                period: config.ema_slow,
            },
        )?;
        let macd = self.trend.macd(
            &closes,
            MacdParams {
                fast_period: config.ema_fast,
                slow_period: config.ema_slow,
                signal_period: config.macd_signal,
            },
        )?;
        let rsi = self.momentum.rsi(
            &closes,
            RsiParams {
                period: config.rsi_period,
            },
        )?;
        let bollinger = self.volatility.bollinger_bands(
            &closes,
            BollingerBandsParams {
                period: config.bollinger_period,
                std_dev_multiplier: config.bollinger_multiplier,
            },
        )?;
        let (volume_sma, volume_ratio) = self.volume.volume_sma_and_ratio(
            &volumes,
            VolumeSmaParams {
                period: config.volume_period,
            },
        )?;

        let mut rows = Vec::with_capacity(candles.len());
        for (i, candle) in candles.iter().enumerate() {
            rows.push(IndicatorRow {
                timestamp: candle.timestamp,
                close: candle.close,
                sma_short: sma_short[i],
                sma_long: sma_long[i],
                ema_fast: ema_fast[i],
                ema_slow: ema_slow[i],
                macd: macd[i].macd,
                macd_signal: macd[i].signal,
                macd_histogram: macd[i].histogram,
                rsi: rsi[i],
                bb_upper: bollinger[i].upper,
                bb_middle: bollinger[i].middle,
                bb_lower: bollinger[i].lower,
                volume_sma: volume_sma[i],
                volume_ratio: volume_ratio[i],
            });
        }

        Ok(rows)
    }
}
