//! The weighted-recommendation core.
//!
//! `aggregate` is a pure function of the normalized scores and the active
//! weight configuration. It never returns an error: every degenerate input
//! (nothing selected, everything unavailable, zero total weight) produces a
//! well-formed Hold recommendation.

use crate::insights;
use crate::weights::WeightConfig;
use analysis_core::{MethodScore, Signal, SummaryRecommendation};

/// Blend per-method scores into a single recommendation.
///
/// Only methods that are both selected and available participate. Each active
/// method contributes `score * weight * confidence / 100`; the blended score
/// is that sum divided by the total active weight. The final signal needs
/// both a score past the threshold and at least two corroborating directional
/// signals, so one extreme low-weight method cannot flip the call on its own.
pub fn aggregate(scores: &[MethodScore], config: &WeightConfig) -> SummaryRecommendation {
    let active: Vec<&MethodScore> = scores
        .iter()
        .filter(|s| s.available && config.is_selected(s.method))
        .collect();

    if active.is_empty() {
        return SummaryRecommendation {
            recommendation: Signal::Hold,
            confidence: 0.0,
            weighted_score: 0.0,
            reasoning: "No analysis data available".to_string(),
            key_insights: Vec::new(),
            strengths: Vec::new(),
            concerns: vec!["Insufficient data for analysis".to_string()],
        };
    }

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for entry in &active {
        let weight = config.weight(entry.method);
        weighted_sum += entry.score * weight * entry.confidence / 100.0;
        total_weight += weight;
    }

    // All active weights zero is a defined state, not an error.
    let weighted_score = if total_weight > 0.0 {
        weighted_sum / total_weight
    } else {
        0.0
    };

    // A confidence-0 method contributes nothing to the score but still counts
    // toward the tallies: it can corroborate direction without magnitude.
    let buy_signals = active.iter().filter(|s| s.signal == Signal::Buy).count();
    let sell_signals = active.iter().filter(|s| s.signal == Signal::Sell).count();

    let (recommendation, confidence) = if weighted_score >= 70.0 && buy_signals >= 2 {
        (Signal::Buy, weighted_score.min(95.0))
    } else if weighted_score <= 39.0 && sell_signals >= 2 {
        (Signal::Sell, (100.0 - weighted_score).min(95.0))
    } else {
        (Signal::Hold, (weighted_score - 50.0).abs() + 40.0)
    };

    let reasoning = format!(
        "{} across {} active method(s): weighted score {:.0}/100 with {} buy and {} sell signal(s)",
        recommendation.label(),
        active.len(),
        weighted_score,
        buy_signals,
        sell_signals,
    );

    SummaryRecommendation {
        recommendation,
        confidence: confidence.round(),
        weighted_score: weighted_score.round(),
        reasoning,
        key_insights: insights::key_insights(active.len(), weighted_score, buy_signals, sell_signals),
        strengths: insights::strengths(&active),
        concerns: insights::concerns(&active),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::Method;
    use std::collections::{BTreeMap, BTreeSet};

    fn score(method: Method, signal: Signal, score: f64, confidence: f64) -> MethodScore {
        MethodScore {
            method,
            signal,
            score,
            confidence,
            reasoning: String::new(),
            available: true,
            metrics: serde_json::Value::Null,
        }
    }

    fn config(rows: &[(Method, f64)]) -> WeightConfig {
        let mut weights = BTreeMap::new();
        let mut selected = BTreeSet::new();
        for (method, weight) in rows {
            weights.insert(*method, *weight);
            selected.insert(*method);
        }
        WeightConfig { weights, selected }
    }

    #[test]
    fn test_empty_input_is_degenerate_hold() {
        let result = aggregate(&[], &config(&[]));
        assert_eq!(result.recommendation, Signal::Hold);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.weighted_score, 0.0);
        assert_eq!(result.reasoning, "No analysis data available");
        assert_eq!(result.concerns, vec!["Insufficient data for analysis"]);
        assert!(result.key_insights.is_empty());
    }

    #[test]
    fn test_all_unavailable_is_degenerate_hold() {
        let mut entry = score(Method::WarrenBuffett, Signal::Hold, 0.0, 0.0);
        entry.available = false;
        let result = aggregate(
            &[entry],
            &config(&[(Method::WarrenBuffett, 100.0)]),
        );
        assert_eq!(result.recommendation, Signal::Hold);
        assert_eq!(result.concerns, vec!["Insufficient data for analysis"]);
    }

    #[test]
    fn test_unavailable_entries_cannot_influence_the_blend() {
        let cfg = config(&[(Method::WarrenBuffett, 50.0), (Method::PeterLynch, 50.0)]);
        let base = vec![score(Method::WarrenBuffett, Signal::Buy, 80.0, 80.0)];

        let mut with_ghost = base.clone();
        // Absurd score/weight on an unavailable entry must change nothing.
        let mut ghost = score(Method::PeterLynch, Signal::Buy, 100.0, 100.0);
        ghost.available = false;
        with_ghost.push(ghost);

        let a = aggregate(&base, &cfg);
        let b = aggregate(&with_ghost, &cfg);
        assert_eq!(a.weighted_score, b.weighted_score);
        assert_eq!(a.recommendation, b.recommendation);
    }

    #[test]
    fn test_deselected_methods_are_excluded_entirely() {
        let mut cfg = config(&[(Method::WarrenBuffett, 50.0)]);
        // Lynch has weight but is not selected.
        cfg.weights.insert(Method::PeterLynch, 50.0);

        let scores = vec![
            score(Method::WarrenBuffett, Signal::Buy, 80.0, 100.0),
            score(Method::PeterLynch, Signal::Sell, 10.0, 100.0),
        ];

        let result = aggregate(&scores, &cfg);
        assert_eq!(result.weighted_score, 80.0);
    }

    #[test]
    fn test_weight_scaling_invariance() {
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Buy, 85.0, 90.0),
            score(Method::CharlieMunger, Signal::Hold, 55.0, 70.0),
            score(Method::Quantitative, Signal::Sell, 35.0, 60.0),
        ];
        let small = config(&[
            (Method::WarrenBuffett, 10.0),
            (Method::CharlieMunger, 5.0),
            (Method::Quantitative, 5.0),
        ]);
        let large = config(&[
            (Method::WarrenBuffett, 50.0),
            (Method::CharlieMunger, 25.0),
            (Method::Quantitative, 25.0),
        ]);

        let a = aggregate(&scores, &small);
        let b = aggregate(&scores, &large);
        assert_eq!(a.weighted_score, b.weighted_score);
        assert_eq!(a.recommendation, b.recommendation);
    }

    #[test]
    fn test_zero_total_weight_is_hold_not_crash() {
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Buy, 90.0, 90.0),
            score(Method::CharlieMunger, Signal::Buy, 90.0, 90.0),
        ];
        let cfg = config(&[(Method::WarrenBuffett, 0.0), (Method::CharlieMunger, 0.0)]);

        let result = aggregate(&scores, &cfg);
        assert_eq!(result.weighted_score, 0.0);
        assert_eq!(result.recommendation, Signal::Hold);
    }

    #[test]
    fn test_single_buy_cannot_fire_buy_branch() {
        // weightedScore is well past 70 but one buy signal is not corroboration.
        let scores = vec![score(Method::WarrenBuffett, Signal::Buy, 95.0, 95.0)];
        let cfg = config(&[(Method::WarrenBuffett, 100.0)]);

        let result = aggregate(&scores, &cfg);
        assert_eq!(result.recommendation, Signal::Hold);
    }

    #[test]
    fn test_two_buys_at_threshold_boundary() {
        // contribution = 80 * 50 * 80 / 100 = 3200 each;
        // weightedSum = 6400, totalWeight = 100, weightedScore = 64 < 70.
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Buy, 80.0, 80.0),
            score(Method::CharlieMunger, Signal::Buy, 80.0, 80.0),
        ];
        let cfg = config(&[(Method::WarrenBuffett, 50.0), (Method::CharlieMunger, 50.0)]);

        let result = aggregate(&scores, &cfg);
        assert_eq!(result.weighted_score, 64.0);
        assert_eq!(result.recommendation, Signal::Hold);
    }

    #[test]
    fn test_corroborated_buy() {
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Buy, 85.0, 95.0),
            score(Method::CharlieMunger, Signal::Buy, 90.0, 90.0),
        ];
        let cfg = config(&[(Method::WarrenBuffett, 50.0), (Method::CharlieMunger, 50.0)]);

        let result = aggregate(&scores, &cfg);
        // weightedScore = (85*50*0.95 + 90*50*0.90) / 100 = 80.875
        assert_eq!(result.weighted_score, 81.0);
        assert_eq!(result.recommendation, Signal::Buy);
        assert_eq!(result.confidence, 81.0);
    }

    #[test]
    fn test_corroborated_sell_confidence_capped() {
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Sell, 2.0, 100.0),
            score(Method::Quantitative, Signal::Sell, 4.0, 100.0),
        ];
        let cfg = config(&[(Method::WarrenBuffett, 50.0), (Method::Quantitative, 50.0)]);

        let result = aggregate(&scores, &cfg);
        assert_eq!(result.recommendation, Signal::Sell);
        // 100 - 3 = 97, capped at 95
        assert_eq!(result.confidence, 95.0);
    }

    #[test]
    fn test_zero_confidence_still_counts_toward_tallies() {
        // The second buy contributes nothing to the score but corroborates
        // direction, so the Buy branch fires. Preserved as observed behavior.
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Buy, 90.0, 100.0),
            score(Method::CharlieMunger, Signal::Buy, 90.0, 0.0),
        ];
        let cfg = config(&[(Method::WarrenBuffett, 90.0), (Method::CharlieMunger, 10.0)]);

        let result = aggregate(&scores, &cfg);
        // weightedSum = 90*90*1.0 + 0 = 8100; totalWeight = 100 -> 81
        assert_eq!(result.weighted_score, 81.0);
        assert_eq!(result.recommendation, Signal::Buy);
    }

    #[test]
    fn test_hold_confidence_formula() {
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Hold, 60.0, 100.0),
            score(Method::CharlieMunger, Signal::Hold, 60.0, 100.0),
        ];
        let cfg = config(&[(Method::WarrenBuffett, 50.0), (Method::CharlieMunger, 50.0)]);

        let result = aggregate(&scores, &cfg);
        assert_eq!(result.recommendation, Signal::Hold);
        // |60 - 50| + 40 = 50
        assert_eq!(result.confidence, 50.0);
    }

    #[test]
    fn test_key_insights_mandatory_rows() {
        let scores = vec![
            score(Method::WarrenBuffett, Signal::Buy, 85.0, 90.0),
            score(Method::Quantitative, Signal::Sell, 30.0, 80.0),
        ];
        let cfg = config(&[(Method::WarrenBuffett, 60.0), (Method::Quantitative, 40.0)]);

        let result = aggregate(&scores, &cfg);
        assert!(result.key_insights.len() >= 3);
        assert!(result.key_insights[0].contains("2"));
        assert!(result.key_insights[1].contains("Weighted score"));
        assert!(result.key_insights[2].contains("1 buy"));
        assert!(result.key_insights[2].contains("1 sell"));
    }
}
