//! Weight and method-selection management.
//!
//! Weights are not required to sum to 100; the aggregator re-normalizes by
//! the total active weight at read time. Selection is independent of weight:
//! a deselected method is excluded entirely, and toggling it back restores
//! its stored weight.

use analysis_core::Method;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Named preset pairing a selection set with a weight vector. Applying a
/// preset replaces both atomically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Preset {
    ValueInvestor,
    GrowthFocused,
    Comprehensive,
}

impl Preset {
    pub fn label(&self) -> &'static str {
        match self {
            Preset::ValueInvestor => "Value Investor",
            Preset::GrowthFocused => "Growth Focused",
            Preset::Comprehensive => "Comprehensive",
        }
    }

    /// The preset's (method, selected, weight) rows in canonical order.
    fn rows(&self) -> [(Method, bool, f64); 5] {
        match self {
            Preset::ValueInvestor => [
                (Method::WarrenBuffett, true, 40.0),
                (Method::CharlieMunger, true, 35.0),
                (Method::PeterLynch, false, 0.0),
                (Method::BillAckman, true, 25.0),
                (Method::Quantitative, false, 0.0),
            ],
            Preset::GrowthFocused => [
                (Method::WarrenBuffett, true, 25.0),
                (Method::CharlieMunger, false, 0.0),
                (Method::PeterLynch, true, 45.0),
                (Method::BillAckman, false, 0.0),
                (Method::Quantitative, true, 30.0),
            ],
            Preset::Comprehensive => [
                (Method::WarrenBuffett, true, 25.0),
                (Method::CharlieMunger, true, 20.0),
                (Method::PeterLynch, true, 20.0),
                (Method::BillAckman, true, 15.0),
                (Method::Quantitative, true, 20.0),
            ],
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "value-investor" => Ok(Preset::ValueInvestor),
            "growth-focused" => Ok(Preset::GrowthFocused),
            "comprehensive" => Ok(Preset::Comprehensive),
            _ => Err(format!("Unknown preset: {}", s)),
        }
    }
}

/// Immutable snapshot of the active configuration, passed into `aggregate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightConfig {
    pub weights: BTreeMap<Method, f64>,
    pub selected: BTreeSet<Method>,
}

impl WeightConfig {
    pub fn weight(&self, method: Method) -> f64 {
        self.weights.get(&method).copied().unwrap_or(0.0)
    }

    pub fn is_selected(&self, method: Method) -> bool {
        self.selected.contains(&method)
    }
}

/// Owns the current weight vector and selection set.
#[derive(Debug, Clone)]
pub struct WeightManager {
    weights: BTreeMap<Method, f64>,
    selected: BTreeSet<Method>,
}

impl WeightManager {
    /// Starts from the Comprehensive preset (all methods active).
    pub fn new() -> Self {
        let mut manager = Self {
            weights: BTreeMap::new(),
            selected: BTreeSet::new(),
        };
        manager.apply_preset(Preset::Comprehensive);
        manager
    }

    pub fn weight(&self, method: Method) -> f64 {
        self.weights.get(&method).copied().unwrap_or(0.0)
    }

    pub fn is_selected(&self, method: Method) -> bool {
        self.selected.contains(&method)
    }

    /// Snapshot for the aggregator / API responses.
    pub fn config(&self) -> WeightConfig {
        WeightConfig {
            weights: self.weights.clone(),
            selected: self.selected.clone(),
        }
    }

    /// Atomically replaces both the selection set and the weight vector.
    pub fn apply_preset(&mut self, preset: Preset) {
        self.weights.clear();
        self.selected.clear();
        for (method, selected, weight) in preset.rows() {
            self.weights.insert(method, weight);
            if selected {
                self.selected.insert(method);
            }
        }
        tracing::debug!("Applied weight preset: {}", preset.label());
    }

    /// Sets one method's weight, clamped to [0, 100]. Sibling weights are not
    /// re-normalized; the aggregator divides by the active total at read time.
    pub fn set_weight(&mut self, method: Method, value: f64) {
        self.weights.insert(method, value.clamp(0.0, 100.0));
    }

    /// Flips a method's selection without touching its stored weight, so
    /// re-enabling restores the prior value.
    pub fn toggle_method(&mut self, method: Method) {
        if !self.selected.remove(&method) {
            self.selected.insert(method);
        }
    }

    /// Assigns equal integer weights to all selected methods summing to
    /// exactly 100. The remainder (100 mod count) goes to the earliest
    /// selected methods in canonical order, keeping the operation
    /// deterministic. Unselected methods get 0. Empty selection is a no-op.
    pub fn auto_distribute(&mut self) {
        let count = self.selected.len();
        if count == 0 {
            return;
        }

        let base = 100 / count;
        let remainder = 100 % count;

        let mut assigned = 0usize;
        for method in Method::ALL {
            if self.selected.contains(&method) {
                let extra = if assigned < remainder { 1 } else { 0 };
                self.weights.insert(method, (base + extra) as f64);
                assigned += 1;
            } else {
                self.weights.insert(method, 0.0);
            }
        }
    }
}

impl Default for WeightManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comprehensive_preset_round_trip() {
        let mut manager = WeightManager::new();
        // Dirty the state first so the preset provably replaces everything.
        manager.set_weight(Method::WarrenBuffett, 3.0);
        manager.toggle_method(Method::PeterLynch);

        manager.apply_preset(Preset::Comprehensive);

        let expected = [25.0, 20.0, 20.0, 15.0, 20.0];
        for (method, weight) in Method::ALL.iter().zip(expected) {
            assert!(manager.is_selected(*method));
            assert_eq!(manager.weight(*method), weight);
        }
    }

    #[test]
    fn test_value_investor_preset_deselects_with_zero_weight() {
        let mut manager = WeightManager::new();
        manager.apply_preset(Preset::ValueInvestor);

        assert!(!manager.is_selected(Method::PeterLynch));
        assert!(!manager.is_selected(Method::Quantitative));
        assert_eq!(manager.weight(Method::PeterLynch), 0.0);
        assert_eq!(manager.weight(Method::WarrenBuffett), 40.0);
        let total: f64 = Method::ALL.iter().map(|m| manager.weight(*m)).sum();
        assert_eq!(total, 100.0);
    }

    #[test]
    fn test_auto_distribute_three_methods() {
        let mut manager = WeightManager::new();
        manager.toggle_method(Method::BillAckman);
        manager.toggle_method(Method::Quantitative);

        manager.auto_distribute();

        // 100 / 3 = 33 rem 1: the first selected method in canonical order
        // takes the remainder.
        assert_eq!(manager.weight(Method::WarrenBuffett), 34.0);
        assert_eq!(manager.weight(Method::CharlieMunger), 33.0);
        assert_eq!(manager.weight(Method::PeterLynch), 33.0);
        assert_eq!(manager.weight(Method::BillAckman), 0.0);
        assert_eq!(manager.weight(Method::Quantitative), 0.0);
    }

    #[test]
    fn test_auto_distribute_always_sums_to_100() {
        for keep in 1..=5usize {
            let mut manager = WeightManager::new();
            for method in Method::ALL.iter().skip(keep) {
                manager.toggle_method(*method);
            }
            manager.auto_distribute();
            let total: f64 = Method::ALL.iter().map(|m| manager.weight(*m)).sum();
            assert_eq!(total, 100.0, "selection of {} methods", keep);
        }
    }

    #[test]
    fn test_auto_distribute_empty_selection_is_noop() {
        let mut manager = WeightManager::new();
        for method in Method::ALL {
            manager.toggle_method(method);
        }
        let before: Vec<f64> = Method::ALL.iter().map(|m| manager.weight(*m)).collect();

        manager.auto_distribute();

        let after: Vec<f64> = Method::ALL.iter().map(|m| manager.weight(*m)).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_set_weight_clamps() {
        let mut manager = WeightManager::new();
        manager.set_weight(Method::PeterLynch, 250.0);
        assert_eq!(manager.weight(Method::PeterLynch), 100.0);
        manager.set_weight(Method::PeterLynch, -10.0);
        assert_eq!(manager.weight(Method::PeterLynch), 0.0);
    }

    #[test]
    fn test_toggle_preserves_stored_weight() {
        let mut manager = WeightManager::new();
        manager.set_weight(Method::BillAckman, 42.0);

        manager.toggle_method(Method::BillAckman);
        assert!(!manager.is_selected(Method::BillAckman));
        assert_eq!(manager.weight(Method::BillAckman), 42.0);

        manager.toggle_method(Method::BillAckman);
        assert!(manager.is_selected(Method::BillAckman));
        assert_eq!(manager.weight(Method::BillAckman), 42.0);
    }

    #[test]
    fn test_preset_parsing() {
        assert_eq!("Value Investor".parse::<Preset>(), Ok(Preset::ValueInvestor));
        assert_eq!("growth-focused".parse::<Preset>(), Ok(Preset::GrowthFocused));
        assert_eq!("COMPREHENSIVE".parse::<Preset>(), Ok(Preset::Comprehensive));
        assert!("balanced".parse::<Preset>().is_err());
    }
}
