use crate::{AnalysisError, Bar, FinancialSnapshot, MarketData, Method, RawMethodOutput};
use async_trait::async_trait;

/// Trait implemented by each scoring heuristic ("Warren Buffett", etc.).
///
/// Analyzers emit their own vocabulary and scale; translation to the common
/// `MethodScore` shape happens in the summary engine, not here.
#[async_trait]
pub trait MethodAnalyzer: Send + Sync {
    fn method(&self) -> Method;

    async fn analyze(
        &self,
        symbol: &str,
        data: &MarketData,
    ) -> Result<RawMethodOutput, AnalysisError>;
}

/// Trait for market data backends (price history + fundamentals).
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    async fn daily_bars(&self, symbol: &str, days_back: i64) -> Result<Vec<Bar>, AnalysisError>;

    async fn snapshot(&self, symbol: &str) -> Result<FinancialSnapshot, AnalysisError>;
}
