//! 입력 시리즈 검증.
//!
//! 모든 윈도우 계산은 연속적이고 충분히 길며 단조 증가하는 시리즈를
//! 가정합니다. 이 게이트를 건너뛰면 조용한 수치 오염(NaN 전파에
//! 해당하는 것)이 생기므로, 계약 위반을 명확한 에러로 바꿉니다.

use rust_decimal::Decimal;
use tracing::warn;

use analyzer_core::config::AnalysisConfig;
use analyzer_core::domain::{Candle, Observation};
use analyzer_core::error::{AnalyzerError, AnalyzerResult};

/// 원시 관측 시리즈 검증기.
///
/// 검증 규칙:
/// 1. 길이가 가장 긴 필요 룩백 윈도우 이상이어야 합니다
///    (미달 시 `InsufficientData`, 부분 결과 없음).
/// 2. 타임스탬프는 엄격히 증가해야 합니다 (`MalformedSeries`).
/// 3. 종가 누락 비율이 설정값을 초과하면 `MalformedSeries`,
///    이하이면 직전 종가로 채우고 경고를 남깁니다.
///    첫 행의 종가 누락은 채울 값이 없으므로 `MalformedSeries`입니다.
/// 4. 음수 가격/거래량은 `MalformedSeries`입니다.
#[derive(Debug, Default)]
pub struct SeriesValidator;

impl SeriesValidator {
    /// 새로운 검증기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 원시 관측 시리즈를 검증하고 캔들 시리즈로 변환합니다.
    ///
    /// 로그 기록 외의 부수효과는 없습니다.
    pub fn validate(
        &self,
        observations: &[Observation],
        config: &AnalysisConfig,
    ) -> AnalyzerResult<Vec<Candle>> {
        let min_length = config.indicators.max_lookback();

        if observations.len() < min_length {
            return Err(AnalyzerError::InsufficientData {
                required: min_length,
                provided: observations.len(),
            });
        }

        // 타임스탬프 단조성
        for pair in observations.windows(2) {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(AnalyzerError::MalformedSeries(format!(
                    "타임스탬프가 엄격히 증가하지 않습니다: {} 다음에 {}",
                    pair[0].timestamp, pair[1].timestamp
                )));
            }
        }

        // 종가 누락 비율
        let missing = observations.iter().filter(|o| o.close.is_none()).count();
        let missing_ratio =
            Decimal::from(missing) / Decimal::from(observations.len());

        if missing_ratio > config.validation.max_missing_ratio {
            return Err(AnalyzerError::MalformedSeries(format!(
                "종가 누락 비율 {missing_ratio}이 허용치 {}를 초과합니다",
                config.validation.max_missing_ratio
            )));
        }

        let mut candles = Vec::with_capacity(observations.len());
        let mut prev_close: Option<Decimal> = None;

        for obs in observations {
            if obs.has_negative_field() {
                return Err(AnalyzerError::MalformedSeries(format!(
                    "{}: 음수 필드가 있습니다",
                    obs.timestamp
                )));
            }

            let close = match obs.close {
                Some(c) => c,
                None => {
                    let Some(fill) = prev_close else {
                        return Err(AnalyzerError::MalformedSeries(
                            "첫 행의 종가가 누락되어 채울 값이 없습니다".to_string(),
                        ));
                    };
                    warn!(
                        timestamp = %obs.timestamp,
                        fill = %fill,
                        "missing close forward-filled from previous row"
                    );
                    fill
                }
            };

            prev_close = Some(close);
            candles.push(Candle::new(
                obs.timestamp,
                obs.open,
                obs.high,
                obs.low,
                close,
                obs.volume,
            ));
        }

        Ok(candles)
    }
}
