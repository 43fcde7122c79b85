//! Fixed-bound checks on individual readings

use super::RuleEvaluator;
use crate::models::{Finding, FindingKind, MeasurementType};
use crate::storage::PatientHistory;

/// Systolic pressure above this is critical
pub const SYSTOLIC_MAX: f64 = 180.0;
/// Systolic pressure below this is critical
pub const SYSTOLIC_MIN: f64 = 90.0;
/// Diastolic pressure above this is critical
pub const DIASTOLIC_MAX: f64 = 120.0;
/// Diastolic pressure below this is critical
pub const DIASTOLIC_MIN: f64 = 60.0;
/// Saturation below this is too low
pub const SATURATION_MIN: f64 = 92.0;
/// Heart rate above this is abnormal
pub const HEART_RATE_MAX: f64 = 100.0;
/// Heart rate below this is abnormal
pub const HEART_RATE_MIN: f64 = 50.0;

/// Exclusive acceptable range; a value equal to a bound is in range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Values strictly below this are out of range
    pub min: Option<f64>,
    /// Values strictly above this are out of range
    pub max: Option<f64>,
}

impl Bounds {
    /// Range with both a lower and an upper bound
    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Range with only a lower bound
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Whether `value` is acceptable
    pub fn contains(&self, value: f64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }
}

/// Emits one finding per reading outside its type's bounds
pub struct ThresholdRule {
    name: &'static str,
    kind: FindingKind,
    limits: Vec<(MeasurementType, Bounds)>,
}

impl ThresholdRule {
    /// Critical systolic and diastolic bounds
    pub fn blood_pressure() -> Self {
        Self {
            name: "blood-pressure-threshold",
            kind: FindingKind::BloodPressureThreshold,
            limits: vec![
                (
                    MeasurementType::SystolicPressure,
                    Bounds::between(SYSTOLIC_MIN, SYSTOLIC_MAX),
                ),
                (
                    MeasurementType::DiastolicPressure,
                    Bounds::between(DIASTOLIC_MIN, DIASTOLIC_MAX),
                ),
            ],
        }
    }

    /// ECG-derived heart rate bounds
    pub fn heart_rate() -> Self {
        Self {
            name: "heart-rate-threshold",
            kind: FindingKind::HeartRateOutOfRange,
            limits: vec![(
                MeasurementType::Ecg,
                Bounds::between(HEART_RATE_MIN, HEART_RATE_MAX),
            )],
        }
    }

    /// Minimum blood saturation
    pub fn saturation() -> Self {
        Self {
            name: "saturation-threshold",
            kind: FindingKind::LowSaturation,
            limits: vec![(MeasurementType::Saturation, Bounds::at_least(SATURATION_MIN))],
        }
    }

    fn bounds_for(&self, kind: &MeasurementType) -> Option<&Bounds> {
        self.limits
            .iter()
            .find(|(watched, _)| watched == kind)
            .map(|(_, bounds)| bounds)
    }
}

impl RuleEvaluator for ThresholdRule {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, history: &PatientHistory, _now: i64) -> Vec<Finding> {
        history
            .records()
            .iter()
            .filter(|record| {
                self.bounds_for(record.kind())
                    .is_some_and(|bounds| !bounds.contains(record.value()))
            })
            .map(|record| Finding::new(history.patient_id(), self.kind, record.timestamp()))
            .collect()
    }
}
