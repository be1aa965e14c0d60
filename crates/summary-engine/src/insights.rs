//! Rule-based strengths/concerns/key-insight derivation from the active
//! method breakdown. No free text generation: every line is a fixed template
//! filled with the method's score and confidence.
//!
//! The selection thresholds are uniform across methods (strength at score
//! >= 70 with confidence >= 70, concern at score <= 40 with confidence >= 70);
//! only the wording is method-specific.

use analysis_core::{Method, MethodScore};

const STRONG_SCORE: f64 = 70.0;
const WEAK_SCORE: f64 = 40.0;
const MIN_CONFIDENCE: f64 = 70.0;

/// One strength line per active method scoring strongly on reliable data.
pub fn strengths(active: &[&MethodScore]) -> Vec<String> {
    active
        .iter()
        .filter(|s| s.score >= STRONG_SCORE && s.confidence >= MIN_CONFIDENCE)
        .map(|s| strength_line(s))
        .collect()
}

/// One concern line per active method scoring weakly on reliable data.
pub fn concerns(active: &[&MethodScore]) -> Vec<String> {
    active
        .iter()
        .filter(|s| s.score <= WEAK_SCORE && s.confidence >= MIN_CONFIDENCE)
        .map(|s| concern_line(s))
        .collect()
}

/// The mandatory insight rows, in fixed order: methods used, weighted score,
/// signal tally.
pub fn key_insights(
    methods_used: usize,
    weighted_score: f64,
    buy_signals: usize,
    sell_signals: usize,
) -> Vec<String> {
    vec![
        format!("Based on {} available analysis method(s)", methods_used),
        format!("Weighted score: {:.0}/100", weighted_score),
        format!("Signal tally: {} buy, {} sell", buy_signals, sell_signals),
    ]
}

fn strength_line(entry: &MethodScore) -> String {
    let detail = match entry.method {
        Method::WarrenBuffett => "sees a durable business at a reasonable price",
        Method::CharlieMunger => "rates this a high-quality compounder",
        Method::PeterLynch => "finds growth at a reasonable price",
        Method::BillAckman => "sees a strong free-cash-flow franchise",
        Method::Quantitative => "shows a favorable risk-adjusted setup",
    };
    format!(
        "{} analysis {} (score {:.0}, confidence {:.0}%)",
        entry.method.label(),
        detail,
        entry.score,
        entry.confidence
    )
}

fn concern_line(entry: &MethodScore) -> String {
    let detail = match entry.method {
        Method::WarrenBuffett => "finds the business weak or overpriced",
        Method::CharlieMunger => "flags poor quality or thin moat",
        Method::PeterLynch => "finds growth too expensive or fading",
        Method::BillAckman => "flags weak cash generation",
        Method::Quantitative => "shows an unfavorable risk profile",
    };
    format!(
        "{} analysis {} (score {:.0}, confidence {:.0}%)",
        entry.method.label(),
        detail,
        entry.score,
        entry.confidence
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Signal;

    fn entry(method: Method, score: f64, confidence: f64) -> MethodScore {
        MethodScore {
            method,
            signal: Signal::Hold,
            score,
            confidence,
            reasoning: String::new(),
            available: true,
            metrics: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_strength_requires_both_thresholds() {
        let strong = entry(Method::WarrenBuffett, 85.0, 90.0);
        let high_score_low_confidence = entry(Method::PeterLynch, 85.0, 50.0);
        let refs = [&strong, &high_score_low_confidence];

        let lines = strengths(&refs);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Warren Buffett"));
        assert!(lines[0].contains("score 85"));
        assert!(lines[0].contains("confidence 90%"));
    }

    #[test]
    fn test_concern_requires_reliable_data() {
        let weak = entry(Method::Quantitative, 25.0, 80.0);
        let weak_but_unreliable = entry(Method::BillAckman, 25.0, 30.0);
        let refs = [&weak, &weak_but_unreliable];

        let lines = concerns(&refs);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("Quantitative"));
    }

    #[test]
    fn test_boundary_values_inclusive() {
        let at_strength = entry(Method::CharlieMunger, 70.0, 70.0);
        let at_concern = entry(Method::PeterLynch, 40.0, 70.0);
        assert_eq!(strengths(&[&at_strength]).len(), 1);
        assert_eq!(concerns(&[&at_concern]).len(), 1);
    }

    #[test]
    fn test_templates_are_method_specific() {
        let buffett = entry(Method::WarrenBuffett, 90.0, 90.0);
        let quant = entry(Method::Quantitative, 90.0, 90.0);
        let lines = strengths(&[&buffett, &quant]);
        assert_ne!(
            lines[0].replace("Warren Buffett", ""),
            lines[1].replace("Quantitative", "")
        );
    }

    #[test]
    fn test_key_insights_fixed_order() {
        let lines = key_insights(3, 64.4, 2, 1);
        assert_eq!(lines[0], "Based on 3 available analysis method(s)");
        assert_eq!(lines[1], "Weighted score: 64/100");
        assert_eq!(lines[2], "Signal tally: 2 buy, 1 sell");
    }
}
