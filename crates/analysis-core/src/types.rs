use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// OHLCV bar data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Point-in-time fundamentals for a company, as handed over by the data provider.
/// Every field is optional: providers routinely omit line items, and each
/// analyzer decides for itself whether enough data is present to run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSnapshot {
    pub symbol: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub revenue: Option<f64>,
    pub revenue_prior_year: Option<f64>,
    pub gross_profit: Option<f64>,
    pub operating_income: Option<f64>,
    pub net_income: Option<f64>,
    pub net_income_prior_year: Option<f64>,
    pub eps: Option<f64>,
    pub eps_prior_year: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub shareholders_equity: Option<f64>,
    pub free_cash_flow: Option<f64>,
    pub shares_outstanding: Option<f64>,
}

/// Everything an analyzer may look at for one symbol.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    pub snapshot: Option<FinancialSnapshot>,
    pub bars: Vec<Bar>,
}

/// The fixed set of analysis methods. The declaration order is a contract:
/// auto-distribution and breakdown listings iterate methods in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Method {
    WarrenBuffett,
    CharlieMunger,
    PeterLynch,
    BillAckman,
    Quantitative,
}

impl Method {
    /// All methods in canonical order.
    pub const ALL: [Method; 5] = [
        Method::WarrenBuffett,
        Method::CharlieMunger,
        Method::PeterLynch,
        Method::BillAckman,
        Method::Quantitative,
    ];

    /// Human-readable display name
    pub fn label(&self) -> &'static str {
        match self {
            Method::WarrenBuffett => "Warren Buffett",
            Method::CharlieMunger => "Charlie Munger",
            Method::PeterLynch => "Peter Lynch",
            Method::BillAckman => "Bill Ackman",
            Method::Quantitative => "Quantitative",
        }
    }

    /// Short identifier used in URLs and query strings
    pub fn slug(&self) -> &'static str {
        match self {
            Method::WarrenBuffett => "buffett",
            Method::CharlieMunger => "munger",
            Method::PeterLynch => "lynch",
            Method::BillAckman => "ackman",
            Method::Quantitative => "quantitative",
        }
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "buffett" | "warren-buffett" | "warrenbuffett" => Ok(Method::WarrenBuffett),
            "munger" | "charlie-munger" | "charliemunger" => Ok(Method::CharlieMunger),
            "lynch" | "peter-lynch" | "peterlynch" => Ok(Method::PeterLynch),
            "ackman" | "bill-ackman" | "billackman" => Ok(Method::BillAckman),
            "quant" | "quantitative" => Ok(Method::Quantitative),
            _ => Err(format!("Unknown analysis method: {}", s)),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Directional call, for a single method or the blended recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl Signal {
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Buy => "Buy",
            Signal::Hold => "Hold",
            Signal::Sell => "Sell",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Signal vocabulary as emitted by the analyzers themselves. The fundamental
/// methods speak bullish/bearish, the Lynch screen uses broker-style calls.
/// Only the normalizer collapses these onto [`Signal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawSignal {
    Bullish,
    Bearish,
    Neutral,
    Buy,
    WeakBuy,
    Hold,
    WeakSell,
    Sell,
}

impl FromStr for RawSignal {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bullish" => Ok(RawSignal::Bullish),
            "bearish" => Ok(RawSignal::Bearish),
            "neutral" => Ok(RawSignal::Neutral),
            "buy" => Ok(RawSignal::Buy),
            "weak_buy" => Ok(RawSignal::WeakBuy),
            "hold" => Ok(RawSignal::Hold),
            "weak_sell" => Ok(RawSignal::WeakSell),
            "sell" => Ok(RawSignal::Sell),
            _ => Err(format!("Unknown raw signal: {}", s)),
        }
    }
}

/// Score scale used by a raw analyzer result.
///
/// The value-investing methods score on a 0-10 conviction scale, the screens
/// on 0-100, and the quantitative engine reports three 0-100 sub-scores that
/// are averaged during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawScore {
    OutOfTen(f64),
    Percent(f64),
    Composite {
        technical: f64,
        fundamental: f64,
        risk_adjusted: f64,
    },
}

/// Untranslated output of one analyzer run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMethodOutput {
    pub method: Method,
    pub signal: RawSignal,
    pub score: RawScore,
    /// 0-100, how complete/reliable the underlying data was
    pub confidence: f64,
    pub reasoning: String,
    /// Computed metrics for the dashboard's detail view
    pub metrics: serde_json::Value,
}

/// One method's contribution in the common shape consumed by the aggregator.
///
/// `available == false` means the method was requested but could not run; it
/// still appears in the breakdown shown to the user but never participates in
/// a weighted sum.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodScore {
    pub method: Method,
    pub signal: Signal,
    /// 0-100
    pub score: f64,
    /// 0-100
    pub confidence: f64,
    pub reasoning: String,
    pub available: bool,
    /// Passed through from the analyzer, opaque to the aggregator
    #[serde(default)]
    pub metrics: serde_json::Value,
}

/// The blended recommendation returned to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecommendation {
    pub recommendation: Signal,
    /// 0-100, rounded to the nearest integer for presentation
    pub confidence: f64,
    /// 0-100, rounded to the nearest integer for presentation
    pub weighted_score: f64,
    pub reasoning: String,
    pub key_insights: Vec<String>,
    pub strengths: Vec<String>,
    pub concerns: Vec<String>,
}

/// Full dashboard payload for one symbol: the per-method breakdown plus the
/// blended summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardAnalysis {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub current_price: Option<f64>,
    pub breakdown: Vec<MethodScore>,
    pub summary: SummaryRecommendation,
}
