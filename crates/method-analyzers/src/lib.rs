//! The five scoring heuristics feeding the summary engine.
//!
//! Each engine speaks its own vocabulary and scale: the value-investing
//! screens score conviction on 0-10 with bullish/bearish calls, the Lynch
//! screen uses broker-style BUY/WEAK_BUY calls on 0-100, and the quantitative
//! engine reports three 0-100 sub-scores. Translation to the common shape is
//! the summary engine's job.

pub mod ackman;
pub mod buffett;
pub mod lynch;
pub mod munger;
pub mod quantitative;

pub use ackman::BillAckmanEngine;
pub use buffett::WarrenBuffettEngine;
pub use lynch::PeterLynchEngine;
pub use munger::CharlieMungerEngine;
pub use quantitative::QuantitativeEngine;

use analysis_core::{Method, MethodAnalyzer};

/// Build the analyzer for one method.
pub fn analyzer_for(method: Method) -> Box<dyn MethodAnalyzer> {
    match method {
        Method::WarrenBuffett => Box::new(WarrenBuffettEngine::new()),
        Method::CharlieMunger => Box::new(CharlieMungerEngine::new()),
        Method::PeterLynch => Box::new(PeterLynchEngine::new()),
        Method::BillAckman => Box::new(BillAckmanEngine::new()),
        Method::Quantitative => Box::new(QuantitativeEngine::new()),
    }
}

/// All analyzers in canonical method order.
pub fn all_analyzers() -> Vec<Box<dyn MethodAnalyzer>> {
    Method::ALL.iter().copied().map(analyzer_for).collect()
}
