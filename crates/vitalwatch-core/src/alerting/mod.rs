//! Alerting system for VitalWatch
//!
//! Provides the clinical rule set, the evaluation engine, alert decoration
//! and the in-memory alert store.

mod decorator;
mod evaluator;
mod generator;
pub mod rules;
mod store;

pub use decorator::{
    decorate, AlertCondition, Prioritized, Recheck, RECHECK_INTERVAL_MS, RECHECK_MARKER,
};
pub use evaluator::AlertEvaluator;
pub use generator::AlertGenerator;
pub use rules::RuleEvaluator;
pub use store::AlertStore;
