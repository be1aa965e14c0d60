//! Peter Lynch screen: growth at a reasonable price. Scores 0-100 and issues
//! broker-style calls (BUY / WEAK_BUY / HOLD / WEAK_SELL / SELL).

use analysis_core::{
    AnalysisError, MarketData, Method, MethodAnalyzer, RawMethodOutput, RawScore, RawSignal,
};
use async_trait::async_trait;
use serde_json::json;

pub struct PeterLynchEngine;

impl PeterLynchEngine {
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
        let total_fields = 3u32;

        let eps_growth = match (snapshot.eps, snapshot.eps_prior_year) {
            (Some(current), Some(prior)) if prior > 0.0 => {
                Some((current - prior) / prior * 100.0)
            }
            _ => None,
        };

        // PEG: the famous "P/E divided by growth" test.
        if let (Some(price), Some(eps), Some(growth)) =
            (snapshot.current_price, snapshot.eps, eps_growth)
        {
            if eps > 0.0 && growth > 0.0 {
                fields_present += 1;
                let peg = (price / eps) / growth;
                let earned = if peg < 1.0 {
                    40.0
                } else if peg < 1.5 {
                    25.0
                } else if peg < 2.5 {
                    10.0
                } else {
                    0.0
                };
                checks.push((format!("PEG {:.2}", peg), earned, 40.0));
                metrics.insert("peg_ratio".to_string(), json!(peg));
            }
        }

        // Revenue growth.
        if let (Some(current), Some(prior)) = (snapshot.revenue, snapshot.revenue_prior_year) {
            if prior > 0.0 {
                fields_present += 1;
                let growth = (current - prior) / prior * 100.0;
                let earned = if growth > 20.0 {
                    30.0
                } else if growth > 10.0 {
                    20.0
                } else if growth > 3.0 {
                    10.0
                } else {
                    0.0
                };
                checks.push((format!("revenue growth {:.1}%", growth), earned, 30.0));
                metrics.insert("revenue_growth".to_string(), json!(growth));
            }
        }

        // Earnings growth.
        if let Some(growth) = eps_growth {
            fields_present += 1;
            let earned = if growth > 25.0 {
                30.0
            } else if growth > 10.0 {
                20.0
            } else if growth > 0.0 {
                10.0
            } else {
                0.0
            };
            checks.push((format!("EPS growth {:.1}%", growth), earned, 30.0));
            metrics.insert("eps_growth".to_string(), json!(growth));
        }

        if checks.is_empty() {
            return Err(AnalysisError::InsufficientData(format!(
                "No usable growth metrics for {}",
                symbol
            )));
        }

        let earned: f64 = checks.iter().map(|c| c.1).sum();
        let possible: f64 = checks.iter().map(|c| c.2).sum();
        let score = earned / possible * 100.0;

        let signal = if score >= 75.0 {
            RawSignal::Buy
        } else if score >= 55.0 {
            RawSignal::WeakBuy
        } else if score <= 20.0 {
            RawSignal::Sell
        } else if score <= 35.0 {
            RawSignal::WeakSell
        } else {
            RawSignal::Hold
        };

        let confidence = fields_present as f64 / total_fields as f64 * 100.0;
        let reasoning = checks
            .iter()
            .map(|c| c.0.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        Ok(RawMethodOutput {
            method: Method::PeterLynch,
            signal,
            score: RawScore::Percent(score),
            confidence,
            reasoning,
            metrics: serde_json::Value::Object(metrics),
        })
    }
}

impl Default for PeterLynchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MethodAnalyzer for PeterLynchEngine {
    fn method(&self) -> Method {
        Method::PeterLynch
    }

    async fn analyze(
        &self,
        symbol: &str,
        data: &MarketData,
    ) -> Result<RawMethodOutput, AnalysisError> {
        self.run(symbol, data)
    }
}
