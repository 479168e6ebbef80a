#![forbid(unsafe_code)]
//! Pure filtering and ordering over validation record summaries.
//! No I/O here; the server feeds this from the validation store and
//! polling clients consume the result.

use certforge_model::{ValidationError, ValidationRecord, ValidationStatus};
use serde::{Deserialize, Serialize};

pub const CRATE_NAME: &str = "certforge-query";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(ValidationStatus),
}

impl StatusFilter {
    /// `"all"` (or empty) keeps everything; otherwise an exact status
    /// match.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let s = input.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        Ok(StatusFilter::Only(ValidationStatus::parse(s)?))
    }

    #[must_use]
    pub fn accepts(self, status: ValidationStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => status == wanted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ValidationFilter {
    pub text: Option<String>,
    pub status: StatusFilter,
}

impl ValidationFilter {
    #[must_use]
    pub fn matches(&self, record: &ValidationRecord) -> bool {
        if !self.status.accepts(record.status) {
            return false;
        }
        match self.text.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                record
                    .certificate_name
                    .to_lowercase()
                    .contains(&needle)
                    || record
                        .category
                        .display_name()
                        .to_lowercase()
                        .contains(&needle)
            }
        }
    }
}

/// Filtered summaries ordered by `submitted_at` descending, newest
/// first; id descending breaks same-millisecond ties.
#[must_use]
pub fn filter_records(records: &[ValidationRecord], filter: &ValidationFilter) -> Vec<ValidationRecord> {
    let mut out: Vec<ValidationRecord> = records
        .iter()
        .filter(|r| filter.matches(r))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        b.submitted_at_ms
            .cmp(&a.submitted_at_ms)
            .then_with(|| b.id.cmp(&a.id))
    });
    out
}
