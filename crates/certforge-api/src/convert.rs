use crate::dto::{
    DetailRowDto, NormBodyDto, NormDto, ValidationDetailDto, ValidationRecordDto,
    ValidationSummaryDto,
};
use certforge_model::{
    Category, DetailRow, Norm, NormDraft, PropertyKind, ValidationDetail, ValidationError,
    ValidationRecord,
};

/// Parse a norm request body into a draft. `kind` defaults to
/// mechanical when omitted, matching the admin form whose bodies
/// carry a unit.
pub fn draft_from_body(body: &NormBodyDto) -> Result<NormDraft, ValidationError> {
    let category = Category::parse(&body.category)?;
    let kind = match body.kind.as_deref() {
        None => PropertyKind::Mechanical,
        Some(raw) => PropertyKind::parse(raw)?,
    };
    Ok(NormDraft {
        category,
        parameter_name: body.parameter.clone(),
        min_value: body.min,
        max_value: body.max,
        unit: body.unit.clone(),
        kind,
    })
}

#[must_use]
pub fn norm_to_dto(norm: &Norm) -> NormDto {
    NormDto {
        id: norm.id.0,
        category: norm.category.id().to_string(),
        parameter: norm.parameter_name.clone(),
        min: norm.min_value,
        max: norm.max_value,
        unit: norm.unit.clone(),
        kind: norm.kind.as_str().to_string(),
        version: norm.version,
    }
}

#[must_use]
pub fn summary_to_dto(record: &ValidationRecord) -> ValidationSummaryDto {
    ValidationSummaryDto {
        id: record.id.0,
        category_name: record.category.display_name().to_string(),
        certificate_name: record.certificate_name.clone(),
        status: record.status.as_str().to_string(),
        date: record.submitted_at_ms,
    }
}

fn row_to_dto(row: &DetailRow) -> DetailRowDto {
    DetailRowDto {
        property: row.property_name.clone(),
        standard: row
            .standard_range
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string),
        test: row
            .measured_value
            .map_or_else(|| "-".to_string(), |v| v.to_string()),
        compliant: row.compliant,
        note: row.note.clone(),
    }
}

/// Group detail rows into the chemical and mechanical tables the
/// detail view renders, keeping row order within each group.
#[must_use]
pub fn detail_to_dto(detail: Option<&ValidationDetail>) -> ValidationDetailDto {
    let Some(detail) = detail else {
        return ValidationDetailDto::default();
    };
    let mut out = ValidationDetailDto::default();
    for row in &detail.rows {
        let dto = row_to_dto(row);
        match row.kind {
            PropertyKind::Chemical => out.chemical.push(dto),
            PropertyKind::Mechanical => out.mechanical.push(dto),
        }
    }
    out
}

#[must_use]
pub fn record_to_dto(
    record: &ValidationRecord,
    detail: Option<&ValidationDetail>,
) -> ValidationRecordDto {
    ValidationRecordDto {
        id: record.id.0,
        category_name: record.category.display_name().to_string(),
        certificate_name: record.certificate_name.clone(),
        status: record.status.as_str().to_string(),
        date: record.submitted_at_ms,
        detail: detail_to_dto(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use certforge_model::{NormId, StandardRange, ValidationId, ValidationStatus};

    #[test]
    fn body_without_kind_defaults_to_mechanical() {
        let body = NormBodyDto {
            category: "Pins".to_string(),
            parameter: "Hardness".to_string(),
            min: Some(50.0),
            max: Some(65.0),
            unit: "HRC".to_string(),
            kind: None,
            expected_version: None,
        };
        let draft = draft_from_body(&body).expect("draft");
        assert_eq!(draft.kind, PropertyKind::Mechanical);
        assert_eq!(draft.category, Category::Pins);
    }

    #[test]
    fn body_with_unknown_category_is_rejected() {
        let body = NormBodyDto {
            category: "engine".to_string(),
            parameter: "Hardness".to_string(),
            min: None,
            max: None,
            unit: String::new(),
            kind: None,
            expected_version: None,
        };
        assert!(draft_from_body(&body).is_err());
    }

    #[test]
    fn detail_rows_are_grouped_by_kind_preserving_order() {
        let range = StandardRange {
            min: Some(0.17),
            max: Some(0.22),
            unit: String::new(),
        };
        let detail = ValidationDetail {
            rows: vec![
                DetailRow::scored("C".to_string(), PropertyKind::Chemical, range.clone(), 0.19),
                DetailRow::scored(
                    "Hardness".to_string(),
                    PropertyKind::Mechanical,
                    StandardRange {
                        min: Some(50.0),
                        max: Some(65.0),
                        unit: "HRC".to_string(),
                    },
                    60.0,
                ),
                DetailRow::informational("Si".to_string(), PropertyKind::Chemical, 0.44),
            ],
            evaluated_norms: Vec::new(),
            evaluated_at_ms: 0,
        };
        let dto = detail_to_dto(Some(&detail));
        assert_eq!(dto.chemical.len(), 2);
        assert_eq!(dto.mechanical.len(), 1);
        assert_eq!(dto.chemical[0].property, "C");
        assert_eq!(dto.chemical[0].standard, "0.17-0.22");
        assert_eq!(dto.chemical[1].property, "Si");
        assert_eq!(dto.chemical[1].standard, "-");
        assert_eq!(dto.chemical[1].compliant, None);
        assert_eq!(dto.mechanical[0].test, "60");
    }

    #[test]
    fn pending_record_maps_to_empty_detail_groups() {
        let record = ValidationRecord {
            id: ValidationId(5),
            category: Category::Pins,
            certificate_name: "cert.pdf".to_string(),
            submitted_at_ms: 123,
            status: ValidationStatus::Pending,
        };
        let dto = record_to_dto(&record, None);
        assert_eq!(dto.status, "pending");
        assert!(dto.detail.chemical.is_empty());
        assert!(dto.detail.mechanical.is_empty());
    }

    #[test]
    fn norm_dto_uses_category_id_and_kind_strings() {
        let norm = Norm {
            id: NormId(9),
            category: Category::Undercarriage,
            parameter_name: "Yield Stress".to_string(),
            min_value: Some(550.0),
            max_value: None,
            unit: "N/mm2".to_string(),
            kind: PropertyKind::Mechanical,
            version: 3,
        };
        let dto = norm_to_dto(&norm);
        assert_eq!(dto.category, "undercarriage");
        assert_eq!(dto.kind, "mechanical");
        assert_eq!(dto.version, 3);
    }
}
