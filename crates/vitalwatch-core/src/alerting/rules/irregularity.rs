//! Beat interval variability across the ECG series

use super::RuleEvaluator;
use crate::models::{Finding, FindingKind, MeasurementType};
use crate::storage::PatientHistory;

/// Interval standard deviation above this is irregular (timestamp units)
pub const INTERVAL_STD_DEV_LIMIT: f64 = 0.1;

/// Fires once per history when the intervals between successive ECG records
/// vary by more than [`INTERVAL_STD_DEV_LIMIT`]
#[derive(Debug, Default)]
pub struct IrregularBeatRule;

impl IrregularBeatRule {
    /// Create the rule
    pub fn new() -> Self {
        Self
    }
}

/// Mean and sample standard deviation (`n - 1` denominator).
///
/// Returns `None` for fewer than two samples, where the sample deviation is
/// undefined.
pub fn mean_and_std_dev(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.len() < 2 {
        return None;
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let squared_deviations: f64 = samples.iter().map(|s| (s - mean).powi(2)).sum();

    Some((mean, (squared_deviations / (n - 1.0)).sqrt()))
}

impl RuleEvaluator for IrregularBeatRule {
    fn name(&self) -> &str {
        "irregular-beat"
    }

    fn evaluate(&self, history: &PatientHistory, _now: i64) -> Vec<Finding> {
        let timestamps: Vec<i64> = history
            .records_of(&MeasurementType::Ecg)
            .map(|record| record.timestamp())
            .collect();

        let intervals: Vec<f64> = timestamps
            .windows(2)
            .map(|pair| pair[1] as f64 - pair[0] as f64)
            .collect();

        let Some((_, std_dev)) = mean_and_std_dev(&intervals) else {
            return Vec::new();
        };

        match timestamps.last() {
            Some(&last) if std_dev > INTERVAL_STD_DEV_LIMIT => vec![Finding::new(
                history.patient_id(),
                FindingKind::IrregularBeat,
                last,
            )],
            _ => Vec::new(),
        }
    }
}
