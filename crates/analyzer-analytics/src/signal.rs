//! 규칙 기반 매매 신호 생성.
//!
//! 지표 행 시퀀스를 규칙 우선순위에 따라 평가하여 행마다 정확히
//! 하나의 신호를 만듭니다. 규칙은 순서대로 검사하며 처음 매칭된
//! 규칙이 행의 신호를 결정합니다:
//!
//! 1. RSI 과매도 / 과매수
//! 2. MACD 상향 / 하향 교차
//! 3. 볼린저 하단 / 상단 밴드 이탈
//! 4. 어느 규칙도 매칭되지 않으면 Hold
//!
//! 필요한 지표가 `None`인 행에서는 해당 규칙을 건너뜁니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use analyzer_core::domain::{SignalRule, TradingSignal};

use crate::indicators::{IndicatorRow, TrendIndicators};

/// RSI 과매도 임계값.
pub const RSI_OVERSOLD: Decimal = dec!(30);

/// RSI 과매수 임계값.
pub const RSI_OVERBOUGHT: Decimal = dec!(70);

/// 규칙 기반 신호 생성기.
///
/// 순수 함수이며 내부 상태가 없습니다. 같은 지표 테이블에 대해
/// 항상 같은 신호 시퀀스를 반환합니다.
#[derive(Debug, Default)]
pub struct SignalGenerator {
    trend: TrendIndicators,
}

impl SignalGenerator {
    /// 새로운 신호 생성기 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지표 테이블에서 행마다 하나의 신호를 생성합니다.
    ///
    /// 반환 벡터는 입력과 같은 길이이며 타임스탬프로 1:1 정렬됩니다.
    pub fn generate(&self, rows: &[IndicatorRow]) -> Vec<TradingSignal> {
        // MACD 교차는 직전 행이 필요하므로 행 단위 평가 전에
        // 시리즈 전체에서 미리 감지
        let macd_line: Vec<Option<Decimal>> = rows.iter().map(|r| r.macd).collect();
        let signal_line: Vec<Option<Decimal>> = rows.iter().map(|r| r.macd_signal).collect();

        let bullish = self.trend.detect_bullish_cross(&macd_line, &signal_line);
        let bearish = self.trend.detect_bearish_cross(&macd_line, &signal_line);

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                match Self::match_rule(row, bullish[i], bearish[i]) {
                    Some(rule) => TradingSignal::from_rule(row.timestamp, rule),
                    None => TradingSignal::hold(row.timestamp),
                }
            })
            .collect()
    }

    /// 우선순위에 따라 첫 매칭 규칙을 반환합니다.
    fn match_rule(row: &IndicatorRow, bullish_cross: bool, bearish_cross: bool) -> Option<SignalRule> {
        if let Some(rsi) = row.rsi {
            if rsi < RSI_OVERSOLD {
                return Some(SignalRule::RsiOversold);
            }
            if rsi > RSI_OVERBOUGHT {
                return Some(SignalRule::RsiOverbought);
            }
        }

        if bullish_cross {
            return Some(SignalRule::MacdBullishCross);
        }
        if bearish_cross {
            return Some(SignalRule::MacdBearishCross);
        }

        if let Some(lower) = row.bb_lower {
            if row.close < lower {
                return Some(SignalRule::BelowLowerBand);
            }
        }
        if let Some(upper) = row.bb_upper {
            if row.close > upper {
                return Some(SignalRule::AboveUpperBand);
            }
        }

        None
    }
}
