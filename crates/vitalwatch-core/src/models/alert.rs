//! Finding and alert data models

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::measurement::PatientId;
use crate::alerting::AlertCondition;

/// The fixed set of conditions the rule evaluators can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// Systolic or diastolic reading outside its critical bounds
    BloodPressureThreshold,
    /// Three systolic readings moving the same way by more than 10 each step
    SystolicTrend,
    /// Three diastolic readings moving the same way by more than 10 each step
    DiastolicTrend,
    /// ECG-derived heart rate outside its bounds
    HeartRateOutOfRange,
    /// Beat intervals vary too much across the ECG series
    IrregularBeat,
    /// Saturation fell by 5 or more across the trailing 10 samples
    RapidSaturationDrop,
    /// Saturation below 92
    LowSaturation,
    /// Low systolic pressure and low saturation both present
    HypotensiveHypoxemia,
}

impl FindingKind {
    /// Human-readable condition label
    pub fn description(self) -> &'static str {
        match self {
            Self::BloodPressureThreshold => "Critical Threshold Alert: Blood Pressure Out of Range",
            Self::SystolicTrend => "Trend Alert: Systolic Blood Pressure Trend Detected",
            Self::DiastolicTrend => "Trend Alert: Diastolic Blood Pressure Trend Detected",
            Self::HeartRateOutOfRange => "Abnormal Heart Rate Alert: Heart Rate Out of Range",
            Self::IrregularBeat => {
                "Irregular Beat Alert: Abnormal Consecutive Beat Intervals Detected"
            }
            Self::RapidSaturationDrop => "Rapid Drop Alert: Blood Saturation Level Fell Rapidly",
            Self::LowSaturation => "Low Saturation Alert: Blood Saturation Level Too Low",
            Self::HypotensiveHypoxemia => {
                "Hypotensive Hypoxemia Alert: Low Blood Pressure and Low Blood Saturation"
            }
        }
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A raw rule violation, before priority and recheck decoration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Patient the finding is about
    pub patient_id: PatientId,
    /// Which condition was met
    pub kind: FindingKind,
    /// Triggering record's timestamp, or evaluation time for combined conditions
    pub timestamp: i64,
}

impl Finding {
    /// Create a new finding
    pub fn new(patient_id: impl Into<PatientId>, kind: FindingKind, timestamp: i64) -> Self {
        Self {
            patient_id: patient_id.into(),
            kind,
            timestamp,
        }
    }

    /// Condition label of the finding
    pub fn description(&self) -> &'static str {
        self.kind.description()
    }
}

/// Priority level attached by the decoration pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Priority {
    /// Low priority
    Low,
    /// Medium priority
    Medium,
    /// High priority
    #[default]
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(level)
    }
}

/// A decorated, stored finding
///
/// Cloning an alert shares its decoration state: the recheck marker is
/// tracked per alert, not per copy.
#[derive(Debug, Clone)]
pub struct Alert {
    kind: FindingKind,
    condition: Arc<dyn AlertCondition>,
}

impl Alert {
    /// Wrap a decorated condition produced for a finding of `kind`
    pub fn new(kind: FindingKind, condition: impl AlertCondition + 'static) -> Self {
        Self {
            kind,
            condition: Arc::new(condition),
        }
    }

    /// Patient the alert is about
    pub fn patient_id(&self) -> &str {
        self.condition.patient_id()
    }

    /// Timestamp inherited from the finding
    pub fn timestamp(&self) -> i64 {
        self.condition.timestamp()
    }

    /// Condition kind, independent of decoration
    pub fn kind(&self) -> FindingKind {
        self.kind
    }

    /// Decorated condition text
    ///
    /// Reading the condition may update recheck state, see
    /// [`crate::alerting::Recheck`].
    pub fn condition(&self) -> String {
        self.condition.condition()
    }

    /// Render an immutable, serializable view of this alert
    pub fn snapshot(&self) -> AlertSnapshot {
        AlertSnapshot {
            patient_id: self.patient_id().to_string(),
            kind: self.kind,
            timestamp: self.timestamp(),
            condition: self.condition(),
        }
    }
}

/// Point-in-time rendering of an [`Alert`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSnapshot {
    /// Patient the alert is about
    pub patient_id: PatientId,
    /// Condition kind
    pub kind: FindingKind,
    /// Timestamp inherited from the finding
    pub timestamp: i64,
    /// Decorated condition text at the time of the snapshot
    pub condition: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Priority::Low, "Low")]
    #[case(Priority::Medium, "Medium")]
    #[case(Priority::High, "High")]
    fn test_priority_display(#[case] priority: Priority, #[case] expected: &str) {
        assert_eq!(priority.to_string(), expected);
    }

    #[test]
    fn test_default_priority_is_high() {
        assert_eq!(Priority::default(), Priority::High);
    }
}
