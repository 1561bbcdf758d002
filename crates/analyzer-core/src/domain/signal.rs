//! 매매 신호 타입.
//!
//! 이 모듈은 신호 생성기가 만들어내는 행 단위 신호 타입을 정의합니다:
//! - `SignalAction` - 매수/매도/보류 액션
//! - `SignalRule` - 신호를 발생시킨 규칙
//! - `TradingSignal` - 타임스탬프별 신호 레코드

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 행 단위 매매 액션.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalAction {
    /// 매수
    Buy,
    /// 매도
    Sell,
    /// 보류
    Hold,
}

impl std::fmt::Display for SignalAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalAction::Buy => write!(f, "BUY"),
            SignalAction::Sell => write!(f, "SELL"),
            SignalAction::Hold => write!(f, "HOLD"),
        }
    }
}

/// 신호를 발생시킨 규칙.
///
/// 규칙은 고정된 우선순위로 평가되며 첫 번째로 일치한 규칙이
/// 행의 신호를 결정합니다: RSI → MACD 교차 → 볼린저 밴드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalRule {
    /// RSI 과매도 (RSI < 30)
    RsiOversold,
    /// RSI 과매수 (RSI > 70)
    RsiOverbought,
    /// MACD 상향 교차 (이전 MACD ≤ 시그널, 현재 MACD > 시그널)
    MacdBullishCross,
    /// MACD 하향 교차
    MacdBearishCross,
    /// 종가가 하단 밴드 아래
    BelowLowerBand,
    /// 종가가 상단 밴드 위
    AboveUpperBand,
}

impl std::fmt::Display for SignalRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalRule::RsiOversold => write!(f, "RSI oversold"),
            SignalRule::RsiOverbought => write!(f, "RSI overbought"),
            SignalRule::MacdBullishCross => write!(f, "MACD bullish cross"),
            SignalRule::MacdBearishCross => write!(f, "MACD bearish cross"),
            SignalRule::BelowLowerBand => write!(f, "below lower band"),
            SignalRule::AboveUpperBand => write!(f, "above upper band"),
        }
    }
}

impl SignalRule {
    /// 이 규칙이 발생시키는 액션을 반환합니다.
    pub fn action(&self) -> SignalAction {
        match self {
            SignalRule::RsiOversold
            | SignalRule::MacdBullishCross
            | SignalRule::BelowLowerBand => SignalAction::Buy,
            SignalRule::RsiOverbought
            | SignalRule::MacdBearishCross
            | SignalRule::AboveUpperBand => SignalAction::Sell,
        }
    }
}

/// 타임스탬프별 매매 신호.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSignal {
    /// 신호가 속한 행의 시각
    pub timestamp: DateTime<Utc>,
    /// 매매 액션
    pub action: SignalAction,
    /// 발생 규칙 (HOLD이면 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<SignalRule>,
}

impl TradingSignal {
    /// 규칙이 발생시킨 신호를 생성합니다.
    pub fn from_rule(timestamp: DateTime<Utc>, rule: SignalRule) -> Self {
        Self {
            timestamp,
            action: rule.action(),
            rule: Some(rule),
        }
    }

    /// 보류 신호를 생성합니다.
    pub fn hold(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            action: SignalAction::Hold,
            rule: None,
        }
    }
}
