//! Patient alert generation
//!
//! Ties the pieces together: reads a history from the provider, runs the
//! rule set, decorates each finding and records the resulting alerts.

use std::sync::Arc;

use tracing::{debug, info};

use super::decorator::decorate;
use super::evaluator::AlertEvaluator;
use super::store::AlertStore;
use crate::clock::Clock;
use crate::models::Alert;
use crate::storage::{HistoryProvider, PatientHistory};

/// Evaluates patient histories and accumulates the alerts they produce
pub struct AlertGenerator {
    provider: Arc<dyn HistoryProvider>,
    clock: Arc<dyn Clock>,
    evaluator: AlertEvaluator,
    store: AlertStore,
}

impl AlertGenerator {
    /// Create a generator with the standard rule set
    pub fn new(provider: Arc<dyn HistoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self::with_evaluator(provider, clock, AlertEvaluator::standard())
    }

    /// Create a generator with a custom rule set
    pub fn with_evaluator(
        provider: Arc<dyn HistoryProvider>,
        clock: Arc<dyn Clock>,
        evaluator: AlertEvaluator,
    ) -> Self {
        Self {
            provider,
            clock,
            evaluator,
            store: AlertStore::new(),
        }
    }

    /// Evaluate one patient's current history; returns the number of alerts recorded.
    ///
    /// Patients without any measurement produce no alerts.
    pub fn evaluate(&self, patient_id: &str) -> usize {
        match self.provider.history(patient_id) {
            Some(history) => self.evaluate_history(&history),
            None => {
                debug!(patient_id, "No measurements for patient");
                0
            }
        }
    }

    /// Evaluate an explicit history snapshot; returns the number of alerts recorded
    pub fn evaluate_history(&self, history: &PatientHistory) -> usize {
        let findings = self.evaluator.evaluate(history, self.clock.now());

        let alerts: Vec<Alert> = findings
            .into_iter()
            .map(|finding| decorate(finding, Arc::clone(&self.clock)))
            .collect();

        for alert in &alerts {
            info!(
                patient_id = alert.patient_id(),
                kind = ?alert.kind(),
                timestamp = alert.timestamp(),
                "Alert triggered"
            );
        }

        let recorded = alerts.len();
        self.store.record_all(alerts);
        recorded
    }

    /// Evaluate every known patient in id order; returns the number of alerts recorded
    pub fn evaluate_all(&self) -> usize {
        self.provider
            .patient_ids()
            .iter()
            .map(|patient_id| self.evaluate(patient_id))
            .sum()
    }

    /// Number of alerts recorded so far
    pub fn alert_count(&self) -> usize {
        self.store.count()
    }

    /// Every recorded alert, in recording order
    pub fn all_alerts(&self) -> Vec<Alert> {
        self.store.all()
    }

    /// One patient's recorded alerts, in recording order
    pub fn alerts_for(&self, patient_id: &str) -> Vec<Alert> {
        self.store.by_patient(patient_id)
    }
}
