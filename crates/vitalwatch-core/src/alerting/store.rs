//! In-memory alert store

use parking_lot::RwLock;

use crate::models::Alert;

/// Append-only list of produced alerts
///
/// Alerts are never removed. Lookups are linear scans; volumes are small.
#[derive(Debug, Default)]
pub struct AlertStore {
    alerts: RwLock<Vec<Alert>>,
}

impl AlertStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alert
    pub fn record(&self, alert: Alert) {
        self.alerts.write().push(alert);
    }

    /// Append several alerts, keeping their order
    pub fn record_all(&self, alerts: impl IntoIterator<Item = Alert>) {
        self.alerts.write().extend(alerts);
    }

    /// Number of stored alerts
    pub fn count(&self) -> usize {
        self.alerts.read().len()
    }

    /// Copy of every stored alert, in insertion order
    pub fn all(&self) -> Vec<Alert> {
        self.alerts.read().clone()
    }

    /// Copy of one patient's alerts, in insertion order
    pub fn by_patient(&self, patient_id: &str) -> Vec<Alert> {
        self.alerts
            .read()
            .iter()
            .filter(|alert| alert.patient_id() == patient_id)
            .cloned()
            .collect()
    }
}
