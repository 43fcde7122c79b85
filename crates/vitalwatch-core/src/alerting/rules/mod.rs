//! Rule evaluators
//!
//! Each rule is a pure function from a patient history to zero or more
//! [`Finding`]s. Records of types a rule does not watch are ignored.

pub mod combined;
pub mod irregularity;
pub mod rapid_drop;
pub mod threshold;
pub mod trend;

pub use combined::HypotensiveHypoxemiaRule;
pub use irregularity::IrregularBeatRule;
pub use rapid_drop::RapidDropRule;
pub use threshold::{Bounds, ThresholdRule};
pub use trend::TrendRule;

use crate::models::Finding;
use crate::storage::PatientHistory;

/// A clinical rule checked against one patient's history
pub trait RuleEvaluator: Send + Sync {
    /// Short identifier used in logs (e.g. `"systolic-trend"`)
    fn name(&self) -> &str;

    /// Evaluate the whole history and return every finding, in record order.
    ///
    /// `now` is the evaluation time in milliseconds; rules whose findings are
    /// not tied to a record stamp them with it.
    fn evaluate(&self, history: &PatientHistory, now: i64) -> Vec<Finding>;
}

#[cfg(test)]
pub(crate) fn history_of(readings: &[(&str, f64, i64)]) -> PatientHistory {
    let mut history = PatientHistory::new("1");
    for &(kind, value, timestamp) in readings {
        history.add_record(kind, value, timestamp);
    }
    history
}
