//! Analysis module.
//!
//! Request and result shapes exchanged between the relay client and the
//! analysis relay.

pub mod model;

pub use model::{
    AnalysisRequest, AnalysisResult, Diagnosis, Disease, HealthStatus, Severity, Treatment,
};
