use crate::category::{Category, ValidationError};
use crate::norm::{Norm, PropertyKind, StandardRange};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const CERTIFICATE_NAME_MAX_LEN: usize = 255;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ValidationId(pub i64);

impl Display for ValidationId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a submitted certificate. `pending` has exactly
/// one outgoing transition, into either terminal state; terminal
/// states have none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationStatus {
    Pending,
    Passed,
    Failed,
}

impl ValidationStatus {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ValidationStatus::Pending),
            "passed" => Ok(ValidationStatus::Passed),
            "failed" => Ok(ValidationStatus::Failed),
            other => Err(ValidationError(format!("unknown status: {other}"))),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationStatus::Pending => "pending",
            ValidationStatus::Passed => "passed",
            ValidationStatus::Failed => "failed",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, ValidationStatus::Pending)
    }
}

impl Display for ValidationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The lifecycle entity tracking one submitted certificate from
/// intake to compliance outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub id: ValidationId,
    pub category: Category,
    pub certificate_name: String,
    pub submitted_at_ms: u64,
    pub status: ValidationStatus,
}

/// One uploaded certificate document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One property value extracted from a certificate document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasuredProperty {
    pub property_name: String,
    pub kind: PropertyKind,
    pub measured_value: f64,
}

/// One measured-vs-standard comparison. `compliant == None` marks an
/// informational row that is excluded from scoring (no standard
/// defined, or a diagnostic note).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRow {
    pub property_name: String,
    pub kind: PropertyKind,
    pub standard_range: Option<StandardRange>,
    pub measured_value: Option<f64>,
    pub compliant: Option<bool>,
    pub note: Option<String>,
}

impl DetailRow {
    #[must_use]
    pub fn scored(
        property_name: String,
        kind: PropertyKind,
        range: StandardRange,
        measured: f64,
    ) -> Self {
        let compliant = range.contains(measured);
        Self {
            property_name,
            kind,
            standard_range: Some(range),
            measured_value: Some(measured),
            compliant: Some(compliant),
            note: None,
        }
    }

    #[must_use]
    pub fn informational(property_name: String, kind: PropertyKind, measured: f64) -> Self {
        Self {
            property_name,
            kind,
            standard_range: None,
            measured_value: Some(measured),
            compliant: None,
            note: Some("no standard defined".to_string()),
        }
    }

    /// Diagnostic row recorded when evaluation itself failed; counts
    /// as non-compliant so the record settles `failed`.
    #[must_use]
    pub fn diagnostic(note: String) -> Self {
        Self {
            property_name: "evaluation".to_string(),
            kind: PropertyKind::Mechanical,
            standard_range: None,
            measured_value: None,
            compliant: Some(false),
            note: Some(note),
        }
    }
}

/// Evaluation outcome attached to a terminal record, including the
/// norm set it was scored against for auditability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationDetail {
    pub rows: Vec<DetailRow>,
    pub evaluated_norms: Vec<Norm>,
    pub evaluated_at_ms: u64,
}

/// Overall outcome: passed iff no scored row is non-compliant.
#[must_use]
pub fn overall_status(rows: &[DetailRow]) -> ValidationStatus {
    if rows.iter().any(|r| r.compliant == Some(false)) {
        ValidationStatus::Failed
    } else {
        ValidationStatus::Passed
    }
}

#[must_use]
pub fn now_unix_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as u64)
}
