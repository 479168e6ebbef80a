// SPDX-License-Identifier: Apache-2.0

use crate::category::{Category, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

pub const PARAMETER_MAX_LEN: usize = 64;
pub const UNIT_MAX_LEN: usize = 16;

/// Server-assigned norm identity. Clients never pick these; a row
/// without an id is a [`NormDraft`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NormId(pub i64);

impl Display for NormId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Property group a norm belongs to. Chemical composition and
/// mechanical test values are kept in separate tables on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Chemical,
    Mechanical,
}

impl PropertyKind {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim().to_ascii_lowercase().as_str() {
            "chemical" => Ok(PropertyKind::Chemical),
            "mechanical" => Ok(PropertyKind::Mechanical),
            other => Err(ValidationError(format!("unknown property kind: {other}"))),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Chemical => "chemical",
            PropertyKind::Mechanical => "mechanical",
        }
    }
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Acceptable range for one property. An absent bound is
/// unconstrained on that side; both bounds are inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub unit: String,
}

impl StandardRange {
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

impl Display for StandardRange {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{min}-{max}"),
            (Some(min), None) => write!(f, ">={min}"),
            (None, Some(max)) => write!(f, "<={max}"),
            (None, None) => write!(f, "-"),
        }
    }
}

/// A norm as proposed by an admin client, before the server has
/// assigned an identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormDraft {
    pub category: Category,
    pub parameter_name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: String,
    pub kind: PropertyKind,
}

impl NormDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = self.parameter_name.trim();
        if name.is_empty() {
            return Err(ValidationError(
                "parameter name must not be empty".to_string(),
            ));
        }
        if name.len() > PARAMETER_MAX_LEN {
            return Err(ValidationError(format!(
                "parameter name exceeds max length {PARAMETER_MAX_LEN}"
            )));
        }
        if self.unit.len() > UNIT_MAX_LEN {
            return Err(ValidationError(format!(
                "unit exceeds max length {UNIT_MAX_LEN}"
            )));
        }
        if let (Some(min), Some(max)) = (self.min_value, self.max_value) {
            if min > max {
                return Err(ValidationError(format!(
                    "min_value {min} exceeds max_value {max}"
                )));
            }
        }
        Ok(())
    }
}

/// A persisted norm. `version` is bumped on every update so admin
/// sessions that read-then-write full rows can detect lost updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Norm {
    pub id: NormId,
    pub category: Category,
    pub parameter_name: String,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub unit: String,
    pub kind: PropertyKind,
    pub version: u64,
}

impl Norm {
    #[must_use]
    pub fn range(&self) -> StandardRange {
        StandardRange {
            min: self.min_value,
            max: self.max_value,
            unit: self.unit.clone(),
        }
    }

    /// Match key for locating the norm that scores a measured
    /// property. Names are compared case-insensitively.
    #[must_use]
    pub fn matches_property(&self, name: &str, kind: PropertyKind) -> bool {
        self.kind == kind && self.parameter_name.eq_ignore_ascii_case(name.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(min: Option<f64>, max: Option<f64>) -> NormDraft {
        NormDraft {
            category: Category::Pins,
            parameter_name: "Hardness".to_string(),
            min_value: min,
            max_value: max,
            unit: "HRC".to_string(),
            kind: PropertyKind::Mechanical,
        }
    }

    #[test]
    fn draft_validation_rejects_empty_parameter_name() {
        let mut d = draft(Some(50.0), Some(65.0));
        d.parameter_name = "   ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn draft_validation_rejects_inverted_bounds() {
        assert!(draft(Some(65.0), Some(50.0)).validate().is_err());
        assert!(draft(Some(50.0), Some(65.0)).validate().is_ok());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let range = StandardRange {
            min: Some(50.0),
            max: Some(65.0),
            unit: "HRC".to_string(),
        };
        assert!(range.contains(50.0));
        assert!(range.contains(65.0));
        assert!(!range.contains(49.999));
        assert!(!range.contains(65.001));
    }

    #[test]
    fn half_open_ranges_are_unconstrained_on_the_absent_side() {
        let at_most = StandardRange {
            min: None,
            max: Some(0.03),
            unit: String::new(),
        };
        assert!(at_most.contains(-1.0));
        assert!(at_most.contains(0.03));
        assert!(!at_most.contains(0.04));

        let at_least = StandardRange {
            min: Some(550.0),
            max: None,
            unit: "N/mm2".to_string(),
        };
        assert!(at_least.contains(550.0));
        assert!(at_least.contains(9000.0));
        assert!(!at_least.contains(549.0));
    }

    #[test]
    fn range_display_matches_admin_table_format() {
        let both = StandardRange {
            min: Some(0.17),
            max: Some(0.22),
            unit: String::new(),
        };
        assert_eq!(both.to_string(), "0.17-0.22");
        let upper = StandardRange {
            min: None,
            max: Some(0.6),
            unit: String::new(),
        };
        assert_eq!(upper.to_string(), "<=0.6");
        let lower = StandardRange {
            min: Some(550.0),
            max: None,
            unit: String::new(),
        };
        assert_eq!(lower.to_string(), ">=550");
    }

    #[test]
    fn property_match_is_case_insensitive_within_kind() {
        let norm = Norm {
            id: NormId(1),
            category: Category::Pins,
            parameter_name: "Hardness".to_string(),
            min_value: Some(50.0),
            max_value: Some(65.0),
            unit: "HRC".to_string(),
            kind: PropertyKind::Mechanical,
            version: 1,
        };
        assert!(norm.matches_property("hardness", PropertyKind::Mechanical));
        assert!(norm.matches_property(" HARDNESS ", PropertyKind::Mechanical));
        assert!(!norm.matches_property("Hardness", PropertyKind::Chemical));
    }
}
