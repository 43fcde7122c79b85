//! Hypotensive hypoxemia: low systolic pressure together with low saturation

use super::threshold::{SATURATION_MIN, SYSTOLIC_MIN};
use super::RuleEvaluator;
use crate::models::{Finding, FindingKind, MeasurementType};
use crate::storage::PatientHistory;

/// Fires once when the history holds any systolic reading below
/// [`SYSTOLIC_MIN`] and any saturation reading below [`SATURATION_MIN`].
///
/// The two readings need not be close in time. The finding carries the
/// evaluation time rather than a record timestamp.
#[derive(Debug, Default)]
pub struct HypotensiveHypoxemiaRule;

impl HypotensiveHypoxemiaRule {
    /// Create the rule
    pub fn new() -> Self {
        Self
    }
}

impl RuleEvaluator for HypotensiveHypoxemiaRule {
    fn name(&self) -> &str {
        "hypotensive-hypoxemia"
    }

    fn evaluate(&self, history: &PatientHistory, now: i64) -> Vec<Finding> {
        let mut hypotensive = false;
        let mut hypoxemic = false;

        for record in history.records() {
            match record.kind() {
                MeasurementType::SystolicPressure if record.value() < SYSTOLIC_MIN => {
                    hypotensive = true;
                }
                MeasurementType::Saturation if record.value() < SATURATION_MIN => {
                    hypoxemic = true;
                }
                _ => {}
            }
            if hypotensive && hypoxemic {
                return vec![Finding::new(
                    history.patient_id(),
                    FindingKind::HypotensiveHypoxemia,
                    now,
                )];
            }
        }

        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::super::history_of;
    use super::*;

    #[test]
    fn test_fires_once_stamped_with_evaluation_time() {
        let history = history_of(&[
            ("SystolicPressure", 85.0, 1_621_453_700),
            ("Saturation", 90.0, 1_621_453_700),
            ("Saturation", 88.0, 1_621_453_800),
        ]);

        let findings = HypotensiveHypoxemiaRule::new().evaluate(&history, 42);

        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].kind, FindingKind::HypotensiveHypoxemia);
        assert_eq!(findings[0].timestamp, 42);
    }

    /// Known limitation: the readings are not required to co-occur in time.
    #[test]
    fn test_readings_far_apart_still_fire() {
        let history = history_of(&[
            ("Saturation", 90.0, 0),
            ("SystolicPressure", 120.0, 5_000_000),
            ("SystolicPressure", 85.0, 99_000_000),
        ]);
        assert_eq!(HypotensiveHypoxemiaRule::new().evaluate(&history, 1).len(), 1);
    }

    #[test]
    fn test_one_condition_alone_does_not_fire() {
        let low_pressure = history_of(&[("SystolicPressure", 85.0, 1), ("Saturation", 95.0, 2)]);
        let low_saturation = history_of(&[("SystolicPressure", 120.0, 1), ("Saturation", 90.0, 2)]);
        let low_diastolic = history_of(&[("DiastolicPressure", 50.0, 1), ("Saturation", 90.0, 2)]);

        for history in [low_pressure, low_saturation, low_diastolic] {
            assert!(HypotensiveHypoxemiaRule::new().evaluate(&history, 1).is_empty());
        }
    }
}
