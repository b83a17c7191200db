//! Analysis domain models.
//!
//! Field names follow the camelCase JSON the upstream model is asked to emit
//! and the relay returns to its callers.

use serde::{Deserialize, Serialize};

/// Inbound relay payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default)]
    pub image_base64: Option<String>,
}

impl AnalysisRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image_base64: Some(image.into()),
        }
    }

    /// The image payload, or `None` when absent or empty.
    pub fn image(&self) -> Option<&str> {
        self.image_base64.as_deref().filter(|s| !s.is_empty())
    }
}

/// Outcome of one analysis: a diagnosis or a recognized "no result".
///
/// Deserialization tries the error shape first, so any object carrying an
/// `error` field is the error variant regardless of what else it holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    Error { error: String },
    Success(Box<Diagnosis>),
}

impl AnalysisResult {
    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            Self::Success(d) => Some(d),
            Self::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { error } => Some(error),
            Self::Success(_) => None,
        }
    }
}

/// A successful fruit diagnosis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnosis {
    pub fruit_type: String,
    pub is_healthy: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_status: Option<HealthStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_edible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edibility_reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_percentage: Option<f64>,
    pub disease: Disease,
    #[serde(default)]
    pub treatment: Treatment,
    #[serde(default)]
    pub additional_notes: String,
}

impl Diagnosis {
    /// Check the numeric ranges serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.disease.confidence) {
            return Err(format!(
                "disease.confidence out of range: {}",
                self.disease.confidence
            ));
        }
        if let Some(pct) = self.affected_percentage {
            if !(0.0..=100.0).contains(&pct) {
                return Err(format!("affectedPercentage out of range: {}", pct));
            }
        }
        Ok(())
    }
}

/// Overall condition of the fruit.
///
/// Matched case-insensitively. Values outside the known set are kept as
/// `Other` so an unexpected label never sinks the whole diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
    Other(String),
}

impl HealthStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::Critical => "Critical",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for HealthStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "excellent" => Self::Excellent,
            "good" => Self::Good,
            "fair" => Self::Fair,
            "poor" => Self::Poor,
            "critical" => Self::Critical,
            _ => Self::Other(s),
        }
    }
}

impl From<HealthStatus> for String {
    fn from(status: HealthStatus) -> Self {
        match status {
            HealthStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Detected disease, or `"None"` with severity `Healthy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Disease {
    pub name: String,
    pub severity: Severity,
    pub confidence: f64,
    #[serde(default)]
    pub description: String,
}

/// Disease severity, matched case-insensitively. Anything else is `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Severity {
    Healthy,
    Mild,
    Moderate,
    Severe,
    Other(String),
}

impl Severity {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Healthy => "Healthy",
            Self::Mild => "Mild",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "healthy" => Self::Healthy,
            "mild" => Self::Mild,
            "moderate" => Self::Moderate,
            "severe" => Self::Severe,
            _ => Self::Other(s),
        }
    }
}

impl From<Severity> for String {
    fn from(severity: Severity) -> Self {
        match severity {
            Severity::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

/// Treatment advice. Each list keeps the model's order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Treatment {
    #[serde(default)]
    pub immediate: Vec<String>,
    #[serde(default)]
    pub prevention: Vec<String>,
    #[serde(default)]
    pub chemicals: Vec<String>,
}
