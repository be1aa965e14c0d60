//! Bill Ackman screen: concentrated bets on simple, predictable,
//! free-cash-flow-generative franchises. Scores 0-100 with
//! bullish/bearish/neutral calls.

use analysis_core::{
    AnalysisError, MarketData, Method, MethodAnalyzer, RawMethodOutput, RawScore, RawSignal,
};
use async_trait::async_trait;
use serde_json::json;

pub struct BillAckmanEngine;

impl BillAckmanEngine {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, symbol: &str, data: &MarketData) -> Result<RawMethodOutput, AnalysisError> {
        let snapshot = data.snapshot.as_ref().ok_or_else(|| {
            AnalysisError::InsufficientData("No financial snapshot available".to_string())
        })?;

        let mut checks: Vec<(String, f64, f64)> = Vec::new();
        let mut metrics = serde_json::Map::new();
        let mut fields_present = 0u32;
        let total_fields = 4u32;

        // Free-cash-flow yield against market cap.
        if let (Some(fcf), Some(market_cap)) = (snapshot.free_cash_flow, snapshot.market_cap) {
            if market_cap > 0.0 {
                fields_present += 1;
                let fcf_yield = fcf / market_cap * 100.0;
                let earned = if fcf_yield > 5.0 {
                    30.0
                } else if fcf_yield > 3.0 {
                    20.0
                } else if fcf_yield > 1.0 {
                    10.0
                } else {
                    0.0
                };
                checks.push((format!("FCF yield {:.1}%", fcf_yield), earned, 30.0));
                metrics.insert("fcf_yield".to_string(), json!(fcf_yield));
            }
        }

        // FCF conversion: cash generation relative to revenue.
        if let (Some(fcf), Some(revenue)) = (snapshot.free_cash_flow, snapshot.revenue) {
            if revenue > 0.0 {
                fields_present += 1;
                let fcf_margin = fcf / revenue * 100.0;
                let earned = if fcf_margin > 20.0 {
                    30.0
                } else if fcf_margin > 10.0 {
                    20.0
                } else if fcf_margin > 5.0 {
                    10.0
                } else {
                    0.0
                };
                checks.push((format!("FCF margin {:.1}%", fcf_margin), earned, 30.0));
                metrics.insert("fcf_margin".to_string(), json!(fcf_margin));
            }
        }

        // Operating margin: simple, predictable businesses have stable high
        // margins.
        if let (Some(operating_income), Some(revenue)) =
            (snapshot.operating_income, snapshot.revenue)
        {
            if revenue > 0.0 {
                fields_present += 1;
                let margin = operating_income / revenue * 100.0;
                let earned = if margin > 20.0 {
                    20.0
                } else if margin > 10.0 {
                    10.0
                } else {
                    0.0
                };
                checks.push((format!("operating margin {:.1}%", margin), earned, 20.0));
                metrics.insert("operating_margin".to_string(), json!(margin));
            }
        }

        // Balance-sheet strength.
        if let (Some(liabilities), Some(assets)) =
            (snapshot.total_liabilities, snapshot.total_assets)
        {
            if assets > 0.0 {
                fields_present += 1;
                let ratio = liabilities / assets;
                let earned = if ratio < 0.5 {
                    20.0
                } else if ratio < 0.7 {
                    10.0
                } else {
                    0.0
                };
                checks.push((format!("liabilities/assets {:.2}", ratio), earned, 20.0));
                metrics.insert("liabilities_to_assets".to_string(), json!(ratio));
            }
        }

        if checks.is_empty() {
            return Err(AnalysisError::InsufficientData(format!(
                "No usable fundamentals for {}",
                symbol
            )));
        }

        let earned: f64 = checks.iter().map(|c| c.1).sum();
        let possible: f64 = checks.iter().map(|c| c.2).sum();
        let score = earned / possible * 100.0;

        let signal = if score >= 70.0 {
            RawSignal::Bullish
        } else if score <= 30.0 {
            RawSignal::Bearish
        } else {
            RawSignal::Neutral
        };

        let confidence = fields_present as f64 / total_fields as f64 * 100.0;
        let reasoning = checks
            .iter()
            .map(|c| c.0.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        Ok(RawMethodOutput {
            method: Method::BillAckman,
            signal,
            score: RawScore::Percent(score),
            confidence,
            reasoning,
            metrics: serde_json::Value::Object(metrics),
        })
    }
}

impl Default for BillAckmanEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MethodAnalyzer for BillAckmanEngine {
    fn method(&self) -> Method {
        Method::BillAckman
    }

    async fn analyze(
        &self,
        symbol: &str,
        data: &MarketData,
    ) -> Result<RawMethodOutput, AnalysisError> {
        self.run(symbol, data)
    }
}
