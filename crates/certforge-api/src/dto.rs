// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Request body for `POST /norms` and `PUT /norms/{id}`. The admin
/// client reads then writes full rows, so update is a full-row body
/// too; `expected_version` opts into the lost-update check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormBodyDto {
    pub category: String,
    pub parameter: String,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub expected_version: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NormDto {
    pub id: i64,
    pub category: String,
    pub parameter: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: String,
    pub kind: String,
    pub version: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationSummaryDto {
    pub id: i64,
    pub category_name: String,
    pub certificate_name: String,
    pub status: String,
    /// Unix epoch milliseconds; the polling client feeds this to
    /// `new Date(...)`.
    pub date: u64,
}

/// One measured-vs-standard row the detail view renders.
/// `compliant == null` marks an informational row excluded from
/// scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DetailRowDto {
    pub property: String,
    pub standard: String,
    pub test: String,
    pub compliant: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationDetailDto {
    pub chemical: Vec<DetailRowDto>,
    pub mechanical: Vec<DetailRowDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValidationRecordDto {
    pub id: i64,
    pub category_name: String,
    pub certificate_name: String,
    pub status: String,
    pub date: u64,
    /// Empty groups while the record is still `pending`.
    pub detail: ValidationDetailDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UploadResponseDto {
    pub message: String,
}
