//! Warren Buffett screen: durable, profitable businesses bought at a
//! reasonable price. Scores conviction on a 0-10 scale.

use analysis_core::{
    AnalysisError, MarketData, Method, MethodAnalyzer, RawMethodOutput, RawScore, RawSignal,
};
use async_trait::async_trait;
use serde_json::json;

pub struct WarrenBuffettEngine;

impl WarrenBuffettEngine {
    pub fn new() -> Self {
        Self
    }

    fn run(&self, symbol: &str, data: &MarketData) -> Result<RawMethodOutput, AnalysisError> {
        let snapshot = data.snapshot.as_ref().ok_or_else(|| {
            AnalysisError::InsufficientData("No financial snapshot available".to_string())
        })?;

        // (observation, points earned, points possible)
        let mut checks: Vec<(String, f64, f64)> = Vec::new();
        let mut metrics = serde_json::Map::new();
        let mut fields_present = 0u32;
        let total_fields = 4u32;

        // Return on equity: Buffett looks for consistently high returns on
        // the owners' capital.
        if let (Some(net_income), Some(equity)) = (snapshot.net_income, snapshot.shareholders_equity) {
            if equity > 0.0 {
                fields_present += 1;
                let roe = net_income / equity * 100.0;
                let earned = if roe > 20.0 {
                    3.0
                } else if roe > 12.0 {
                    2.0
                } else if roe > 6.0 {
                    1.0
                } else {
                    0.0
                };
                checks.push((format!("ROE {:.1}%", roe), earned, 3.0));
                metrics.insert("roe".to_string(), json!(roe));
            }
        }

        // Leverage: a fortress balance sheet over a levered one.
        if let (Some(liabilities), Some(equity)) =
            (snapshot.total_liabilities, snapshot.shareholders_equity)
        {
            if equity > 0.0 {
                fields_present += 1;
                let d2e = liabilities / equity;
                let earned = if d2e < 0.5 {
                    2.0
                } else if d2e < 1.0 {
                    1.0
                } else {
                    0.0
                };
                checks.push((format!("debt/equity {:.2}", d2e), earned, 2.0));
                metrics.insert("debt_to_equity".to_string(), json!(d2e));
            }
        }

        // Operating margin as the moat proxy.
        if let (Some(operating_income), Some(revenue)) =
            (snapshot.operating_income, snapshot.revenue)
        {
            if revenue > 0.0 {
                fields_present += 1;
                let margin = operating_income / revenue * 100.0;
                let earned = if margin > 25.0 {
                    3.0
                } else if margin > 15.0 {
                    2.0
                } else if margin > 8.0 {
                    1.0
                } else {
                    0.0
                };
                checks.push((format!("operating margin {:.1}%", margin), earned, 3.0));
                metrics.insert("operating_margin".to_string(), json!(margin));
            }
        }

        // Earnings direction: shrinking earnings break the consistency test.
        if let (Some(current), Some(prior)) =
            (snapshot.net_income, snapshot.net_income_prior_year)
        {
            if prior > 0.0 {
                fields_present += 1;
                let growth = (current - prior) / prior * 100.0;
                let earned = if growth > 10.0 {
                    2.0
                } else if growth > 0.0 {
                    1.0
                } else {
                    0.0
                };
                checks.push((format!("earnings growth {:.1}%", growth), earned, 2.0));
                metrics.insert("earnings_growth".to_string(), json!(growth));
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
        let score = earned / possible * 10.0;

        let signal = if score >= 6.5 {
            RawSignal::Bullish
        } else if score <= 3.5 {
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
            method: Method::WarrenBuffett,
            signal,
            score: RawScore::OutOfTen(score),
            confidence,
            reasoning,
            metrics: serde_json::Value::Object(metrics),
        })
    }
}

impl Default for WarrenBuffettEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MethodAnalyzer for WarrenBuffettEngine {
    fn method(&self) -> Method {
        Method::WarrenBuffett
    }

    async fn analyze(
        &self,
        symbol: &str,
        data: &MarketData,
    ) -> Result<RawMethodOutput, AnalysisError> {
        self.run(symbol, data)
    }
}
