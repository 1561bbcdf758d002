//! 분석 시스템의 에러 타입.
//!
//! 이 모듈은 분석 파이프라인 전반에서 사용되는 에러 타입을 정의합니다.
//! 계산 자체는 순수 산술이므로 일시적 실패가 존재하지 않습니다.
//! 모든 에러는 입력 계약 위반이며, 복구 없이 즉시 전파됩니다.

use thiserror::Error;

/// 핵심 분석 에러.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// 데이터 부족 에러
    ///
    /// 시리즈 길이가 가장 긴 필요 룩백 윈도우보다 짧을 때 발생합니다.
    /// 부분 결과는 절대 반환되지 않습니다.
    #[error("데이터가 부족합니다: 필요 {required}개, 제공 {provided}개")]
    InsufficientData { required: usize, provided: usize },

    /// 비정상 시리즈 에러
    ///
    /// 타임스탬프가 단조 증가하지 않거나 필수 필드가 누락/음수일 때 발생합니다.
    #[error("비정상 시리즈: {0}")]
    MalformedSeries(String),

    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),

    /// 설정 에러
    #[error("설정 에러: {0}")]
    Config(String),
}

/// 분석 작업을 위한 Result 타입.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

impl AnalyzerError {
    /// 입력 계약 위반(치명적) 에러인지 확인합니다.
    ///
    /// `InsufficientData`와 `MalformedSeries`는 해당 심볼의 분석 전체를
    /// 중단시킵니다.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            AnalyzerError::InsufficientData { .. } | AnalyzerError::MalformedSeries(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyzerError::InsufficientData {
            required: 50,
            provided: 10,
        };
        let msg = err.to_string();
        assert!(msg.contains("50"));
        assert!(msg.contains("10"));
    }

    #[test]
    fn test_contract_violation() {
        assert!(AnalyzerError::MalformedSeries("test".to_string()).is_contract_violation());
        assert!(AnalyzerError::InsufficientData {
            required: 2,
            provided: 1
        }
        .is_contract_violation());
        assert!(!AnalyzerError::Config("test".to_string()).is_contract_violation());
    }
}
