//! Data models for VitalWatch

mod alert;
mod measurement;

pub use alert::*;
pub use measurement::*;
