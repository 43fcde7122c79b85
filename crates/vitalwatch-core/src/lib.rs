//! # VitalWatch
//!
//! Rule-based alerting over patient vital-sign streams.
//!
//! VitalWatch evaluates each patient's measurement history against a fixed
//! set of clinical rules and keeps the resulting alerts in memory.
//!
//! ## Architecture
//!
//! - **Ingest**: parses producer lines (socket or log file) into measurement records
//! - **Storage**: concurrent per-patient, append-only histories
//! - **Alerting**: rule evaluators, the evaluation engine, alert decoration and the alert store
//!
//! ## Quick Start
//!
//! ```bash
//! # Evaluate a directory of simulator log files
//! vitalwatch evaluate --source ./output
//!
//! # Follow a live producer
//! vitalwatch listen --addr 127.0.0.1:8080
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_precision_loss)]

pub mod alerting;
pub mod clock;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod storage;

pub use crate::config::Config;
pub use crate::error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::alerting::{AlertEvaluator, AlertGenerator, RuleEvaluator};
    pub use crate::clock::{Clock, ManualClock, SystemClock};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::ingest::{DataReader, FileReader, TcpReader};
    pub use crate::models::*;
    pub use crate::storage::{DataStorage, HistoryProvider, PatientHistory};
}
