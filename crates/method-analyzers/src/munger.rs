//! Charlie Munger screen: business quality above all. Rewards high returns
//! on capital, fat gross margins, and conservative balance sheets. Scores
//! conviction on a 0-10 scale.

use analysis_core::{
    AnalysisError, MarketData, Method, MethodAnalyzer, RawMethodOutput, RawScore, RawSignal,
};
use async_trait::async_trait;
use serde_json::json;

pub struct CharlieMungerEngine;

impl CharlieMungerEngine {
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

        // Return on invested capital, approximated on total assets.
        if let (Some(operating_income), Some(assets)) =
            (snapshot.operating_income, snapshot.total_assets)
        {
            if assets > 0.0 {
                fields_present += 1;
                let roic = operating_income / assets * 100.0;
                let earned = if roic > 15.0 {
                    3.0
                } else if roic > 8.0 {
                    2.0
                } else if roic > 4.0 {
                    1.0
                } else {
                    0.0
                };
                checks.push((format!("ROIC {:.1}%", roic), earned, 3.0));
                metrics.insert("roic".to_string(), json!(roic));
            }
        }

        // Gross margin as the pricing-power proxy.
        if let (Some(gross_profit), Some(revenue)) = (snapshot.gross_profit, snapshot.revenue) {
            if revenue > 0.0 {
                fields_present += 1;
                let margin = gross_profit / revenue * 100.0;
                let earned = if margin > 50.0 {
                    3.0
                } else if margin > 35.0 {
                    2.0
                } else if margin > 20.0 {
                    1.0
                } else {
                    0.0
                };
                checks.push((format!("gross margin {:.1}%", margin), earned, 3.0));
                metrics.insert("gross_margin".to_string(), json!(margin));
            }
        }

        // Leverage discipline.
        if let (Some(liabilities), Some(assets)) =
            (snapshot.total_liabilities, snapshot.total_assets)
        {
            if assets > 0.0 {
                fields_present += 1;
                let ratio = liabilities / assets;
                let earned = if ratio < 0.4 {
                    2.0
                } else if ratio < 0.6 {
                    1.0
                } else {
                    0.0
                };
                checks.push((format!("liabilities/assets {:.2}", ratio), earned, 2.0));
                metrics.insert("liabilities_to_assets".to_string(), json!(ratio));
            }
        }

        // Predictability: positive and growing earnings.
        if let (Some(current), Some(prior)) =
            (snapshot.net_income, snapshot.net_income_prior_year)
        {
            fields_present += 1;
            let earned = if current > 0.0 && current >= prior {
                2.0
            } else if current > 0.0 {
                1.0
            } else {
                0.0
            };
            checks.push(("earnings predictability".to_string(), earned, 2.0));
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

        let signal = if score >= 7.0 {
            RawSignal::Bullish
        } else if score <= 3.0 {
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
            method: Method::CharlieMunger,
            signal,
            score: RawScore::OutOfTen(score),
            confidence,
            reasoning,
            metrics: serde_json::Value::Object(metrics),
        })
    }
}

impl Default for CharlieMungerEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MethodAnalyzer for CharlieMungerEngine {
    fn method(&self) -> Method {
        Method::CharlieMunger
    }

    async fn analyze(
        &self,
        symbol: &str,
        data: &MarketData,
    ) -> Result<RawMethodOutput, AnalysisError> {
        self.run(symbol, data)
    }
}
