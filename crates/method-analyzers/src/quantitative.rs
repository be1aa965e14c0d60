//! Quantitative engine: price-series statistics blended with a valuation
//! composite. Reports three 0-100 sub-scores (technical, fundamental,
//! risk-adjusted) that the normalizer averages into one method score.

use analysis_core::{
    AnalysisError, Bar, MarketData, Method, MethodAnalyzer, RawMethodOutput, RawScore, RawSignal,
};
use async_trait::async_trait;
use serde_json::json;
use statrs::statistics::Statistics;

const MIN_BARS: usize = 30;
const RISK_FREE_RATE: f64 = 0.045;

pub struct QuantitativeEngine;

impl QuantitativeEngine {
    pub fn new() -> Self {
        Self
    }

    fn calculate_returns(&self, closes: &[f64]) -> Vec<f64> {
        closes.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
    }

    /// RSI over the final `period` bars (Wilder smoothing omitted; simple
    /// average gains/losses are enough for a banded signal).
    fn calculate_rsi(&self, closes: &[f64], period: usize) -> f64 {
        if closes.len() <= period {
            return 50.0;
        }
        let window = &closes[closes.len() - period - 1..];
        let mut gains = 0.0;
        let mut losses = 0.0;
        for pair in window.windows(2) {
            let change = pair[1] - pair[0];
            if change > 0.0 {
                gains += change;
            } else {
                losses -= change;
            }
        }
        if losses == 0.0 {
            return 100.0;
        }
        let rs = gains / losses;
        100.0 - 100.0 / (1.0 + rs)
    }

    fn calculate_max_drawdown(&self, closes: &[f64]) -> f64 {
        let mut peak = closes[0];
        let mut max_dd = 0.0;
        for &price in closes {
            if price > peak {
                peak = price;
            }
            let drawdown = (peak - price) / peak;
            if drawdown > max_dd {
                max_dd = drawdown;
            }
        }
        max_dd * 100.0
    }

    fn calculate_sharpe(&self, returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        let mean_return = returns.mean();
        let std_dev = returns.std_dev();
        if std_dev == 0.0 {
            return 0.0;
        }
        let annualized_return = mean_return * 252.0;
        let annualized_volatility = std_dev * (252.0_f64).sqrt();
        (annualized_return - RISK_FREE_RATE) / annualized_volatility
    }

    /// Momentum + RSI band, mapped to 0-100 around a neutral 50.
    fn technical_score(&self, closes: &[f64]) -> f64 {
        let lookback = closes.len().min(20);
        let start = closes[closes.len() - lookback];
        let momentum = (closes[closes.len() - 1] - start) / start * 100.0;

        let mut score = 50.0 + momentum * 2.0;

        let rsi = self.calculate_rsi(closes, 14);
        if rsi > 70.0 {
            score -= 15.0; // overbought
        } else if rsi < 30.0 {
            score += 15.0; // oversold bounce setup
        }

        score.clamp(0.0, 100.0)
    }

    /// Valuation composite from the snapshot; neutral 50 when no snapshot was
    /// handed over.
    fn fundamental_score(&self, data: &MarketData) -> f64 {
        let snapshot = match &data.snapshot {
            Some(s) => s,
            None => return 50.0,
        };

        let mut score: f64 = 50.0;

        if let (Some(price), Some(eps)) = (snapshot.current_price, snapshot.eps) {
            if eps > 0.0 {
                let pe = price / eps;
                if pe < 15.0 {
                    score += 20.0;
                } else if pe > 40.0 {
                    score -= 20.0;
                }
            } else {
                score -= 15.0; // unprofitable
            }
        }

        if let (Some(net_income), Some(revenue)) = (snapshot.net_income, snapshot.revenue) {
            if revenue > 0.0 {
                let margin = net_income / revenue * 100.0;
                if margin > 15.0 {
                    score += 15.0;
                } else if margin < 0.0 {
                    score -= 15.0;
                }
            }
        }

        score.clamp(0.0, 100.0)
    }

    /// Sharpe mapped onto 0-100, with a drawdown penalty.
    fn risk_adjusted_score(&self, closes: &[f64], returns: &[f64]) -> f64 {
        let sharpe = self.calculate_sharpe(returns);
        // Sharpe -1..2 spans the useful range
        let mut score = (sharpe + 1.0) / 3.0 * 100.0;

        let max_dd = self.calculate_max_drawdown(closes);
        if max_dd > 30.0 {
            score -= 20.0;
        } else if max_dd > 15.0 {
            score -= 10.0;
        }

        score.clamp(0.0, 100.0)
    }

    fn run(&self, symbol: &str, data: &MarketData) -> Result<RawMethodOutput, AnalysisError> {
        if data.bars.len() < MIN_BARS {
            return Err(AnalysisError::InsufficientData(format!(
                "Need at least {} bars for {}, got {}",
                MIN_BARS,
                symbol,
                data.bars.len()
            )));
        }

        let closes: Vec<f64> = data.bars.iter().map(|b: &Bar| b.close).collect();
        let returns = self.calculate_returns(&closes);

        let technical = self.technical_score(&closes);
        let fundamental = self.fundamental_score(data);
        let risk_adjusted = self.risk_adjusted_score(&closes, &returns);

        let composite = (technical + fundamental + risk_adjusted) / 3.0;
        let signal = if composite >= 60.0 {
            RawSignal::Bullish
        } else if composite <= 40.0 {
            RawSignal::Bearish
        } else {
            RawSignal::Neutral
        };

        // Confidence grows with price history; thin fundamentals cost a bit.
        let history_ratio = (data.bars.len() as f64 / 252.0).min(1.0);
        let mut confidence = 40.0 + history_ratio * 60.0;
        if data.snapshot.is_none() {
            confidence -= 20.0;
        }
        let confidence = confidence.clamp(10.0, 100.0);

        let reasoning = format!(
            "technical {:.0}, fundamental {:.0}, risk-adjusted {:.0} over {} bars",
            technical,
            fundamental,
            risk_adjusted,
            data.bars.len()
        );

        let metrics = json!({
            "rsi": self.calculate_rsi(&closes, 14),
            "sharpe_ratio": self.calculate_sharpe(&returns),
            "max_drawdown": self.calculate_max_drawdown(&closes),
            "bar_count": data.bars.len(),
        });

        Ok(RawMethodOutput {
            method: Method::Quantitative,
            signal,
            score: RawScore::Composite {
                technical,
                fundamental,
                risk_adjusted,
            },
            confidence,
            reasoning,
            metrics,
        })
    }
}

impl Default for QuantitativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MethodAnalyzer for QuantitativeEngine {
    fn method(&self) -> Method {
        Method::Quantitative
    }

    async fn analyze(
        &self,
        symbol: &str,
        data: &MarketData,
    ) -> Result<RawMethodOutput, AnalysisError> {
        self.run(symbol, data)
    }
}
