//! Measurement data model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque patient identifier
pub type PatientId = String;

/// Kind of vital-sign reading carried by a measurement
///
/// The set is open-ended: labels the rules do not watch are kept as
/// [`MeasurementType::Other`] and ignored by every evaluator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MeasurementType {
    /// Systolic blood pressure (mmHg)
    SystolicPressure,
    /// Diastolic blood pressure (mmHg)
    DiastolicPressure,
    /// Blood oxygen saturation (%)
    Saturation,
    /// ECG-derived heart rate
    Ecg,
    /// Any other label, kept verbatim
    Other(String),
}

impl MeasurementType {
    /// Wire label for this type
    pub fn label(&self) -> &str {
        match self {
            Self::SystolicPressure => "SystolicPressure",
            Self::DiastolicPressure => "DiastolicPressure",
            Self::Saturation => "Saturation",
            Self::Ecg => "ECG",
            Self::Other(label) => label,
        }
    }
}

impl From<&str> for MeasurementType {
    fn from(label: &str) -> Self {
        match label {
            "SystolicPressure" => Self::SystolicPressure,
            "DiastolicPressure" => Self::DiastolicPressure,
            "Saturation" => Self::Saturation,
            "ECG" => Self::Ecg,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for MeasurementType {
    fn from(label: String) -> Self {
        Self::from(label.as_str())
    }
}

impl From<MeasurementType> for String {
    fn from(kind: MeasurementType) -> Self {
        kind.label().to_string()
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single timestamped reading for one patient
///
/// Records are immutable once created; fields are only readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    patient_id: PatientId,
    #[serde(rename = "type")]
    kind: MeasurementType,
    value: f64,
    timestamp: i64,
}

impl MeasurementRecord {
    /// Create a new record
    pub fn new(
        patient_id: impl Into<PatientId>,
        kind: impl Into<MeasurementType>,
        value: f64,
        timestamp: i64,
    ) -> Self {
        Self {
            patient_id: patient_id.into(),
            kind: kind.into(),
            value,
            timestamp,
        }
    }

    /// Patient this reading belongs to
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Type tag of the reading
    pub fn kind(&self) -> &MeasurementType {
        &self.kind
    }

    /// Measured value
    pub fn value(&self) -> f64 {
        self.value
    }

    /// Producer timestamp in milliseconds
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Whether this record carries the given type
    pub fn is(&self, kind: &MeasurementType) -> bool {
        &self.kind == kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_round_trip() {
        let labels = [
            "SystolicPressure",
            "DiastolicPressure",
            "Saturation",
            "ECG",
            "WhiteBloodCells",
        ];
        for label in labels {
            assert_eq!(MeasurementType::from(label).label(), label);
        }
        assert_eq!(MeasurementType::from("ECG"), MeasurementType::Ecg);
        assert_eq!(
            MeasurementType::from("Temperature"),
            MeasurementType::Other("Temperature".to_string())
        );
    }

    #[test]
    fn test_record_serializes_wire_label() {
        let record = MeasurementRecord::new("7", MeasurementType::Ecg, 72.0, 1000);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "ECG");
        assert_eq!(json["patient_id"], "7");
        assert_eq!(json["timestamp"], 1000);
    }
}
