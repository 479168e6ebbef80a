#![forbid(unsafe_code)]
//! Certforge model SSOT.

mod category;
mod norm;
mod record;

pub use category::{parse_category, Category, ValidationError};
pub use norm::{
    NormDraft, Norm, NormId, PropertyKind, StandardRange, PARAMETER_MAX_LEN, UNIT_MAX_LEN,
};
pub use record::{
    now_unix_ms, overall_status, DetailRow, Document, MeasuredProperty, ValidationDetail,
    ValidationId, ValidationRecord, ValidationStatus, CERTIFICATE_NAME_MAX_LEN,
};

pub const CRATE_NAME: &str = "certforge-model";
