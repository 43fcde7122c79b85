//! Consecutive-change detection on blood pressure

use std::collections::VecDeque;

use super::RuleEvaluator;
use crate::models::{Finding, FindingKind, MeasurementType};
use crate::storage::PatientHistory;

/// Number of consecutive readings compared
pub const TREND_WINDOW: usize = 3;

/// Each step of a trend must move by more than this
pub const TREND_STEP: f64 = 10.0;

/// Fires when the last three readings of one signal all rise, or all fall,
/// by more than [`TREND_STEP`] per step
pub struct TrendRule {
    name: &'static str,
    kind: FindingKind,
    signal: MeasurementType,
}

impl TrendRule {
    /// Trend on systolic pressure
    pub fn systolic() -> Self {
        Self {
            name: "systolic-trend",
            kind: FindingKind::SystolicTrend,
            signal: MeasurementType::SystolicPressure,
        }
    }

    /// Trend on diastolic pressure
    pub fn diastolic() -> Self {
        Self {
            name: "diastolic-trend",
            kind: FindingKind::DiastolicTrend,
            signal: MeasurementType::DiastolicPressure,
        }
    }
}

fn is_trend(window: &VecDeque<f64>) -> bool {
    let (first, middle, last) = (window[0], window[1], window[2]);
    let rising = last - middle > TREND_STEP && middle - first > TREND_STEP;
    let falling = first - middle > TREND_STEP && middle - last > TREND_STEP;
    rising || falling
}

impl RuleEvaluator for TrendRule {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, history: &PatientHistory, _now: i64) -> Vec<Finding> {
        let mut findings = Vec::new();
        let mut window: VecDeque<f64> = VecDeque::with_capacity(TREND_WINDOW + 1);

        for record in history.records_of(&self.signal) {
            window.push_back(record.value());
            if window.len() > TREND_WINDOW {
                window.pop_front();
            }

            if window.len() == TREND_WINDOW && is_trend(&window) {
                findings.push(Finding::new(
                    history.patient_id(),
                    self.kind,
                    record.timestamp(),
                ));
                // a matched run must be refilled before it can fire again
                window.pop_front();
            }
        }

        findings
    }
}
