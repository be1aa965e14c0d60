//! Runs the per-method analyzers for one symbol and feeds the summary engine.
//!
//! Data fetches happen concurrently up front; each requested analyzer then
//! settles independently, so a single failed method degrades to an
//! "unavailable" breakdown row instead of failing the whole analysis.

use analysis_core::{
    AnalysisError, Bar, DashboardAnalysis, FinancialSnapshot, MarketData, MarketDataProvider,
    Method, MethodAnalyzer, MethodScore, RawMethodOutput,
};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use summary_engine::{aggregate, normalize_outcome, WeightConfig};

const CACHE_TTL_SECS: i64 = 300; // 5 minutes
const HISTORY_DAYS: i64 = 365;

/// Internal cache entry with timestamp
struct CacheEntry<T> {
    data: T,
    cached_at: DateTime<Utc>,
}

impl<T: Clone> CacheEntry<T> {
    fn fresh(&self) -> Option<T> {
        let age = (Utc::now() - self.cached_at).num_seconds();
        (age < CACHE_TTL_SECS).then(|| self.data.clone())
    }
}

pub struct DashboardOrchestrator {
    provider: Arc<dyn MarketDataProvider>,
    analyzers: Vec<Box<dyn MethodAnalyzer>>,
    bars_cache: DashMap<String, CacheEntry<Vec<Bar>>>,
    snapshot_cache: DashMap<String, CacheEntry<FinancialSnapshot>>,
}

impl DashboardOrchestrator {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            analyzers: method_analyzers::all_analyzers(),
            bars_cache: DashMap::new(),
            snapshot_cache: DashMap::new(),
        }
    }

    /// Analyze one symbol with the given weight configuration. Only selected
    /// methods are requested; everything else stays out of the breakdown.
    ///
    /// This never fails outright: if no data can be fetched every requested
    /// method reports unavailable and the summary degrades to Hold.
    pub async fn analyze(&self, symbol: &str, config: &WeightConfig) -> DashboardAnalysis {
        let symbol = symbol.to_uppercase();
        tracing::info!(
            "Starting analysis for {} with {} selected method(s)",
            symbol,
            config.selected.len()
        );

        let (bars_result, snapshot_result) = tokio::join!(
            self.get_bars(&symbol),
            self.get_snapshot(&symbol),
        );

        let bars = match bars_result {
            Ok(bars) => bars,
            Err(e) => {
                tracing::warn!("Price history unavailable for {}: {}", symbol, e);
                Vec::new()
            }
        };

        let mut snapshot = match snapshot_result {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!("Fundamentals unavailable for {}: {}", symbol, e);
                None
            }
        };

        // Providers report fundamentals without a quote; the last close is
        // the price the valuation screens work against.
        let current_price = bars.last().map(|b| b.close);
        if let (Some(snapshot), Some(price)) = (snapshot.as_mut(), current_price) {
            snapshot.current_price.get_or_insert(price);
        }

        let data = MarketData { snapshot, bars };

        let mut outcomes: BTreeMap<Method, Result<RawMethodOutput, AnalysisError>> =
            BTreeMap::new();
        for analyzer in &self.analyzers {
            let method = analyzer.method();
            if !config.is_selected(method) {
                continue;
            }
            let outcome = analyzer.analyze(&symbol, &data).await;
            if let Err(e) = &outcome {
                tracing::warn!("{} analysis failed for {}: {}", method, symbol, e);
            }
            outcomes.insert(method, outcome);
        }

        let breakdown: Vec<MethodScore> = Method::ALL
            .iter()
            .filter_map(|m| normalize_outcome(*m, outcomes.get(m)))
            .collect();

        let summary = aggregate(&breakdown, config);
        tracing::info!(
            "{}: {} (score {:.0}, confidence {:.0})",
            symbol,
            summary.recommendation,
            summary.weighted_score,
            summary.confidence
        );

        DashboardAnalysis {
            symbol,
            timestamp: Utc::now(),
            current_price,
            breakdown,
            summary,
        }
    }

    /// Daily bars for a symbol (cached, 5-min TTL)
    async fn get_bars(&self, symbol: &str) -> Result<Vec<Bar>, AnalysisError> {
        if let Some(entry) = self.bars_cache.get(symbol) {
            if let Some(bars) = entry.fresh() {
                return Ok(bars);
            }
        }

        let bars = self.provider.daily_bars(symbol, HISTORY_DAYS).await?;
        self.bars_cache.insert(
            symbol.to_string(),
            CacheEntry {
                data: bars.clone(),
                cached_at: Utc::now(),
            },
        );
        Ok(bars)
    }

    /// Fundamentals snapshot for a symbol (cached, 5-min TTL)
    async fn get_snapshot(&self, symbol: &str) -> Result<FinancialSnapshot, AnalysisError> {
        if let Some(entry) = self.snapshot_cache.get(symbol) {
            if let Some(snapshot) = entry.fresh() {
                return Ok(snapshot);
            }
        }

        let snapshot = self.provider.snapshot(symbol).await?;
        self.snapshot_cache.insert(
            symbol.to_string(),
            CacheEntry {
                data: snapshot.clone(),
                cached_at: Utc::now(),
            },
        );
        Ok(snapshot)
    }
}
