//! Saturation decline across a trailing sample window

use std::collections::VecDeque;

use super::RuleEvaluator;
use crate::models::{Finding, FindingKind, MeasurementType};
use crate::storage::PatientHistory;

/// Number of saturation samples spanned by the window
pub const DROP_WINDOW: usize = 10;

/// Minimum fall from the oldest to the newest sample that fires
pub const DROP_THRESHOLD: f64 = 5.0;

/// Fires when saturation falls by [`DROP_THRESHOLD`] or more between the
/// oldest and newest of the last [`DROP_WINDOW`] saturation samples.
///
/// The window is counted in samples, not time. It is tested each time it
/// fills to [`DROP_WINDOW`] and then slides by one.
#[derive(Debug, Default)]
pub struct RapidDropRule;

impl RapidDropRule {
    /// Create the rule
    pub fn new() -> Self {
        Self
    }
}

impl RuleEvaluator for RapidDropRule {
    fn name(&self) -> &str {
        "saturation-rapid-drop"
    }

    fn evaluate(&self, history: &PatientHistory, _now: i64) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut window: VecDeque<f64> = VecDeque::with_capacity(DROP_WINDOW);

        for record in history.records_of(&MeasurementType::Saturation) {
            window.push_back(record.value());
            if window.len() < DROP_WINDOW {
                continue;
            }

            if let (Some(oldest), Some(newest)) = (window.front(), window.back()) {
                if oldest - newest >= DROP_THRESHOLD {
                    findings.push(Finding::new(
                        history.patient_id(),
                        FindingKind::RapidSaturationDrop,
                        record.timestamp(),
                    ));
                }
            }
            window.pop_front();
        }

        findings
    }
}
