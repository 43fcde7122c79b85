//! Two-patient alert generation through the public API

use std::sync::Arc;

use pretty_assertions::assert_eq;
use vitalwatch::prelude::*;

const NOW: i64 = 1_621_453_800;

fn populate(storage: &DataStorage) {
    storage.add_patient_data("1", 170.0, "SystolicPressure", 1_621_453_100);
    storage.add_patient_data("1", 150.0, "SystolicPressure", 1_621_453_200);
    storage.add_patient_data("1", 120.0, "SystolicPressure", 1_621_453_300);
    storage.add_patient_data("1", 95.0, "Saturation", 1_621_453_100);
    storage.add_patient_data("1", 90.0, "Saturation", 1_621_453_200);
    storage.add_patient_data("1", 115.0, "ECG", 1_621_453_100);

    for i in 0..10 {
        let timestamp = 1_621_453_600 + i64::from(i) * 60;
        storage.add_patient_data("2", 96.0 - f64::from(i), "Saturation", timestamp);
    }
    storage.add_patient_data("2", 85.0, "SystolicPressure", 1_621_453_700);
    storage.add_patient_data("2", 90.0, "Saturation", 1_621_453_700);
    storage.add_patient_data("2", 0.8, "ECG", 10_000);
    storage.add_patient_data("2", 1.2, "ECG", 12_000);
    storage.add_patient_data("2", 70.0, "DiastolicPressure", 1_621_453_500);
    storage.add_patient_data("2", 90.0, "DiastolicPressure", 1_621_453_600);
    storage.add_patient_data("2", 110.0, "DiastolicPressure", 1_621_453_700);
}

fn generator() -> AlertGenerator {
    let storage = Arc::new(DataStorage::new());
    populate(&storage);
    AlertGenerator::new(storage, Arc::new(ManualClock::new(NOW)))
}

#[test]
fn patient_one_alerts_in_rule_order() {
    let generator = generator();
    generator.evaluate("1");

    let conditions: Vec<String> = generator.alerts_for("1").iter().map(Alert::condition).collect();
    assert_eq!(
        conditions,
        vec![
            "Trend Alert: Systolic Blood Pressure Trend Detected [Priority: High]",
            "Abnormal Heart Rate Alert: Heart Rate Out of Range [Priority: High]",
            "Low Saturation Alert: Blood Saturation Level Too Low [Priority: High]",
        ]
    );
    assert_eq!(generator.alert_count(), 3);
}

#[test]
fn patient_two_alert_kinds() {
    let generator = generator();
    generator.evaluate("2");

    let kinds: Vec<FindingKind> = generator.alerts_for("2").iter().map(Alert::kind).collect();

    let mut expected = vec![
        FindingKind::DiastolicTrend,
        FindingKind::BloodPressureThreshold,
        FindingKind::HeartRateOutOfRange,
        FindingKind::HeartRateOutOfRange,
        FindingKind::RapidSaturationDrop,
        FindingKind::RapidSaturationDrop,
    ];
    expected.extend([FindingKind::LowSaturation; 6]);
    expected.push(FindingKind::HypotensiveHypoxemia);

    assert_eq!(kinds, expected);
}

#[test]
fn all_patients_together() {
    let generator = generator();
    assert_eq!(generator.evaluate_all(), 16);

    assert_eq!(generator.alert_count(), 16);
    assert_eq!(generator.alerts_for("1").len(), 3);
    assert_eq!(generator.alerts_for("2").len(), 13);
    assert!(generator.alerts_for("3").is_empty());

    // the ECG findings are stamped far in the past, so they read as rechecked
    let heart_rate: Vec<String> = generator
        .alerts_for("2")
        .iter()
        .filter(|a| a.kind() == FindingKind::HeartRateOutOfRange)
        .map(Alert::condition)
        .collect();
    assert!(heart_rate.iter().all(|c| c
        == "Abnormal Heart Rate Alert: Heart Rate Out of Range (rechecked) [Priority: High]"));

    // two ECG beats make a single interval: no irregular-beat alert
    assert!(generator
        .all_alerts()
        .iter()
        .all(|a| a.kind() != FindingKind::IrregularBeat));
}

#[test]
fn snapshots_serialize() {
    let generator = generator();
    generator.evaluate("1");

    let snapshot = generator.all_alerts()[0].snapshot();
    let json = serde_json::to_value(&snapshot).unwrap();

    assert_eq!(json["patient_id"], "1");
    assert_eq!(json["kind"], "systolic_trend");
    assert_eq!(json["timestamp"], 1_621_453_300);
    assert_eq!(
        json["condition"],
        "Trend Alert: Systolic Blood Pressure Trend Detected [Priority: High]"
    );
}
