//! Adapters from each analyzer's idiosyncratic output to the common
//! `MethodScore` shape.
//!
//! A method has three possible outcomes: not requested (it simply does not
//! appear in the breakdown), requested but unavailable (present with
//! `available = false`, excluded from every weighted sum), and available.

use analysis_core::{
    AnalysisError, Method, MethodScore, RawMethodOutput, RawScore, RawSignal, Signal,
};

/// Convert a successful analyzer run into a `MethodScore`.
pub fn normalize(raw: &RawMethodOutput) -> MethodScore {
    MethodScore {
        method: raw.method,
        signal: normalize_signal(raw.signal),
        score: normalize_score(&raw.score),
        confidence: raw.confidence.clamp(0.0, 100.0),
        reasoning: raw.reasoning.clone(),
        available: true,
        metrics: raw.metrics.clone(),
    }
}

/// Placeholder entry for a method that was requested but could not run
/// (missing financials, too few bars, upstream fetch failure).
pub fn unavailable(method: Method) -> MethodScore {
    MethodScore {
        method,
        signal: Signal::Hold,
        score: 0.0,
        confidence: 0.0,
        reasoning: "Analysis not available".to_string(),
        available: false,
        metrics: serde_json::Value::Null,
    }
}

/// Three-state outcome mapping: `None` means the method was never requested
/// and must not appear in the breakdown at all.
pub fn normalize_outcome(
    method: Method,
    outcome: Option<&Result<RawMethodOutput, AnalysisError>>,
) -> Option<MethodScore> {
    match outcome {
        None => None,
        Some(Err(_)) => Some(unavailable(method)),
        Some(Ok(raw)) => Some(normalize(raw)),
    }
}

/// Collapse analyzer vocabularies onto Buy/Hold/Sell.
pub fn normalize_signal(raw: RawSignal) -> Signal {
    match raw {
        RawSignal::Bullish | RawSignal::Buy | RawSignal::WeakBuy => Signal::Buy,
        RawSignal::Bearish | RawSignal::Sell | RawSignal::WeakSell => Signal::Sell,
        RawSignal::Neutral | RawSignal::Hold => Signal::Hold,
    }
}

/// Bring every score scale onto 0-100. Conviction scores on 0-10 are scaled
/// up; the quantitative composite is the mean of its three sub-scores.
pub fn normalize_score(score: &RawScore) -> f64 {
    let value = match *score {
        RawScore::OutOfTen(v) => v * 10.0,
        RawScore::Percent(v) => v,
        RawScore::Composite {
            technical,
            fundamental,
            risk_adjusted,
        } => (technical + fundamental + risk_adjusted) / 3.0,
    };
    value.clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(method: Method, signal: RawSignal, score: RawScore) -> RawMethodOutput {
        RawMethodOutput {
            method,
            signal,
            score,
            confidence: 80.0,
            reasoning: "test".to_string(),
            metrics: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_signal_mapping_buy_family() {
        for s in [RawSignal::Bullish, RawSignal::Buy, RawSignal::WeakBuy] {
            assert_eq!(normalize_signal(s), Signal::Buy);
        }
    }

    #[test]
    fn test_signal_mapping_sell_family() {
        for s in [RawSignal::Bearish, RawSignal::Sell, RawSignal::WeakSell] {
            assert_eq!(normalize_signal(s), Signal::Sell);
        }
    }

    #[test]
    fn test_signal_mapping_everything_else_is_hold() {
        for s in [RawSignal::Neutral, RawSignal::Hold] {
            assert_eq!(normalize_signal(s), Signal::Hold);
        }
    }

    #[test]
    fn test_out_of_ten_scale() {
        assert_eq!(normalize_score(&RawScore::OutOfTen(7.5)), 75.0);
        assert_eq!(normalize_score(&RawScore::OutOfTen(0.0)), 0.0);
        assert_eq!(normalize_score(&RawScore::OutOfTen(10.0)), 100.0);
    }

    #[test]
    fn test_percent_passes_through() {
        assert_eq!(normalize_score(&RawScore::Percent(64.0)), 64.0);
    }

    #[test]
    fn test_composite_is_mean_of_sub_scores() {
        let score = RawScore::Composite {
            technical: 60.0,
            fundamental: 90.0,
            risk_adjusted: 30.0,
        };
        assert_eq!(normalize_score(&score), 60.0);
    }

    #[test]
    fn test_scores_clamped_to_valid_range() {
        assert_eq!(normalize_score(&RawScore::OutOfTen(12.0)), 100.0);
        assert_eq!(normalize_score(&RawScore::Percent(-5.0)), 0.0);
    }

    #[test]
    fn test_unavailable_placeholder() {
        let entry = unavailable(Method::PeterLynch);
        assert!(!entry.available);
        assert_eq!(entry.score, 0.0);
        assert_eq!(entry.confidence, 0.0);
        assert_eq!(entry.signal, Signal::Hold);
        assert_eq!(entry.reasoning, "Analysis not available");
    }

    #[test]
    fn test_requesting_three_of_five_yields_three_rows() {
        // Buffett succeeds, Lynch fails, Quantitative succeeds; the other two
        // were never requested and must not fabricate breakdown rows.
        let buffett = Ok(raw(
            Method::WarrenBuffett,
            RawSignal::Bullish,
            RawScore::OutOfTen(8.0),
        ));
        let lynch: Result<RawMethodOutput, AnalysisError> =
            Err(AnalysisError::InsufficientData("no financials".to_string()));
        let quant = Ok(raw(
            Method::Quantitative,
            RawSignal::Neutral,
            RawScore::Composite {
                technical: 50.0,
                fundamental: 50.0,
                risk_adjusted: 50.0,
            },
        ));

        let outcomes = [
            (Method::WarrenBuffett, Some(&buffett)),
            (Method::CharlieMunger, None),
            (Method::PeterLynch, Some(&lynch)),
            (Method::BillAckman, None),
            (Method::Quantitative, Some(&quant)),
        ];

        let breakdown: Vec<MethodScore> = outcomes
            .iter()
            .filter_map(|(m, o)| normalize_outcome(*m, *o))
            .collect();

        assert_eq!(breakdown.len(), 3);
        assert!(breakdown[0].available);
        assert!(!breakdown[1].available);
        assert_eq!(breakdown[1].method, Method::PeterLynch);
        assert!(breakdown[2].available);
    }
}
