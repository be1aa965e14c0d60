//! Blends heterogeneous per-method analysis scores into one weighted
//! Buy/Hold/Sell recommendation.
//!
//! The engine is pure and synchronous: `aggregate` is a stateless function of
//! the normalized scores and the active weight configuration, recomputed from
//! scratch on every input change. All fallible states (method unavailable,
//! nothing selected, zero total weight) resolve to well-formed Hold
//! recommendations rather than errors.

pub mod aggregate;
pub mod insights;
pub mod normalize;
pub mod weights;

pub use aggregate::aggregate;
pub use normalize::{normalize, normalize_outcome, unavailable};
pub use weights::{Preset, WeightConfig, WeightManager};
