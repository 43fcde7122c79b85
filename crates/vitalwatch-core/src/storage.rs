//! Per-patient measurement history
//!
//! [`DataStorage`] is the in-process [`HistoryProvider`]: ingestion appends
//! to it while the alerting core reads cloned snapshots.

use dashmap::DashMap;
use tracing::trace;

use crate::models::{MeasurementRecord, MeasurementType, PatientId};

/// Read access to patient histories, as consumed by the alerting core
pub trait HistoryProvider: Send + Sync {
    /// Snapshot of one patient's history, if any measurement was seen
    fn history(&self, patient_id: &str) -> Option<PatientHistory>;

    /// Every known patient id, sorted
    fn patient_ids(&self) -> Vec<PatientId>;

    /// All records for a patient in arrival order
    fn all_records_for(&self, patient_id: &str) -> Vec<MeasurementRecord> {
        self.history(patient_id)
            .map(PatientHistory::into_records)
            .unwrap_or_default()
    }

    /// Records with `from <= timestamp <= to`, in arrival order
    fn records_in_range(&self, patient_id: &str, from: i64, to: i64) -> Vec<MeasurementRecord> {
        self.history(patient_id)
            .map(|history| history.records_in_range(from, to).cloned().collect())
            .unwrap_or_default()
    }
}

/// Append-only, arrival-ordered measurements for one patient
#[derive(Debug, Clone, PartialEq)]
pub struct PatientHistory {
    patient_id: PatientId,
    records: Vec<MeasurementRecord>,
}

impl PatientHistory {
    /// Create an empty history
    pub fn new(patient_id: impl Into<PatientId>) -> Self {
        Self {
            patient_id: patient_id.into(),
            records: Vec::new(),
        }
    }

    /// Patient this history belongs to
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    /// Append a reading for this patient
    pub fn add_record(&mut self, kind: impl Into<MeasurementType>, value: f64, timestamp: i64) {
        self.records.push(MeasurementRecord::new(
            self.patient_id.clone(),
            kind,
            value,
            timestamp,
        ));
    }

    /// Append an already-built record
    ///
    /// The record's patient id is not re-checked; callers route records by id.
    pub fn push(&mut self, record: MeasurementRecord) {
        self.records.push(record);
    }

    /// All records in arrival order
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    /// Records of one type, in arrival order
    pub fn records_of<'a>(
        &'a self,
        kind: &'a MeasurementType,
    ) -> impl Iterator<Item = &'a MeasurementRecord> + 'a {
        self.records.iter().filter(move |record| record.is(kind))
    }

    /// Records with `from <= timestamp <= to`, in arrival order
    pub fn records_in_range(
        &self,
        from: i64,
        to: i64,
    ) -> impl Iterator<Item = &MeasurementRecord> + '_ {
        self.records
            .iter()
            .filter(move |record| (from..=to).contains(&record.timestamp()))
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record has been added
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the history, keeping only its records
    pub fn into_records(self) -> Vec<MeasurementRecord> {
        self.records
    }
}

/// Concurrent in-memory store of patient histories
#[derive(Debug, Default)]
pub struct DataStorage {
    patients: DashMap<PatientId, PatientHistory>,
}

impl DataStorage {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to its patient's history, creating the history on first sight
    pub fn add_record(&self, record: MeasurementRecord) {
        trace!(
            patient_id = record.patient_id(),
            kind = %record.kind(),
            value = record.value(),
            timestamp = record.timestamp(),
            "Storing measurement"
        );

        self.patients
            .entry(record.patient_id().to_string())
            .or_insert_with(|| PatientHistory::new(record.patient_id()))
            .push(record);
    }

    /// Append a reading given its parts
    pub fn add_patient_data(
        &self,
        patient_id: impl Into<PatientId>,
        value: f64,
        kind: impl Into<MeasurementType>,
        timestamp: i64,
    ) {
        self.add_record(MeasurementRecord::new(patient_id, kind, value, timestamp));
    }

    /// Number of patients with at least one record
    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Total number of stored records
    pub fn record_count(&self) -> usize {
        self.patients.iter().map(|entry| entry.value().len()).sum()
    }
}

impl HistoryProvider for DataStorage {
    fn history(&self, patient_id: &str) -> Option<PatientHistory> {
        self.patients.get(patient_id).map(|entry| entry.value().clone())
    }

    fn patient_ids(&self) -> Vec<PatientId> {
        let mut ids: Vec<PatientId> = self
            .patients
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        ids
    }
}
