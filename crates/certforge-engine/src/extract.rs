// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use certforge_model::{Document, MeasuredProperty, PropertyKind};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractError(pub String);

impl Display for ExtractError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ExtractError {}

/// Pluggable boundary for measurement extraction. The comparison
/// pipeline does not care how properties leave the document; real
/// deployments plug an OCR/LLM-backed extractor in here.
#[async_trait]
pub trait PropertyExtractor: Send + Sync + 'static {
    async fn extract(&self, document: &Document) -> Result<Vec<MeasuredProperty>, ExtractError>;
}

/// Default extractor: documents are UTF-8 tables with one
/// `name,kind,value` triple per line (`#` lines and blanks skipped),
/// e.g. `Hardness,mechanical,60`. Corrupt input is a parse failure,
/// which the engine settles as `failed`.
#[derive(Default)]
pub struct InlineTableExtractor;

#[async_trait]
impl PropertyExtractor for InlineTableExtractor {
    async fn extract(&self, document: &Document) -> Result<Vec<MeasuredProperty>, ExtractError> {
        let text = std::str::from_utf8(&document.bytes).map_err(|_| {
            ExtractError(format!(
                "document {} is not valid UTF-8",
                document.file_name
            ))
        })?;
        let mut out = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(3, ',');
            let (name, kind, value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(n), Some(k), Some(v)) => (n.trim(), k.trim(), v.trim()),
                _ => {
                    return Err(ExtractError(format!(
                        "document {} line {}: expected name,kind,value",
                        document.file_name,
                        line_no + 1
                    )))
                }
            };
            if name.is_empty() {
                return Err(ExtractError(format!(
                    "document {} line {}: empty property name",
                    document.file_name,
                    line_no + 1
                )));
            }
            let kind = PropertyKind::parse(kind).map_err(|e| {
                ExtractError(format!(
                    "document {} line {}: {e}",
                    document.file_name,
                    line_no + 1
                ))
            })?;
            // Certificates from German mills use a decimal comma;
            // splitn(3) keeps everything after the second comma in
            // the value field, so normalize it here.
            let measured_value = value.replace(',', ".").parse::<f64>().map_err(|_| {
                ExtractError(format!(
                    "document {} line {}: unparseable value {value:?}",
                    document.file_name,
                    line_no + 1
                ))
            })?;
            out.push(MeasuredProperty {
                property_name: name.to_string(),
                kind,
                measured_value,
            });
        }
        Ok(out)
    }
}

/// Test extractor keyed by file name, in the FakeStore style: each
/// registered document yields a canned result or a canned failure.
#[derive(Default)]
pub struct FixtureExtractor {
    results: Mutex<HashMap<String, Result<Vec<MeasuredProperty>, ExtractError>>>,
}

impl FixtureExtractor {
    pub async fn with_properties(&self, file_name: &str, properties: Vec<MeasuredProperty>) {
        self.results
            .lock()
            .await
            .insert(file_name.to_string(), Ok(properties));
    }

    pub async fn with_failure(&self, file_name: &str, message: &str) {
        self.results
            .lock()
            .await
            .insert(file_name.to_string(), Err(ExtractError(message.to_string())));
    }
}

#[async_trait]
impl PropertyExtractor for FixtureExtractor {
    async fn extract(&self, document: &Document) -> Result<Vec<MeasuredProperty>, ExtractError> {
        self.results
            .lock()
            .await
            .get(&document.file_name)
            .cloned()
            .unwrap_or_else(|| {
                Err(ExtractError(format!(
                    "no fixture registered for {}",
                    document.file_name
                )))
            })
    }
}
