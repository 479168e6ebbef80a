use certforge_model::{
    Category, Norm, NormId, PropertyKind, ValidationId, ValidationRecord, ValidationStatus,
};

#[test]
fn category_and_status_serialize_snake_case() {
    assert_eq!(
        serde_json::to_string(&Category::Undercarriage).expect("json"),
        "\"undercarriage\""
    );
    assert_eq!(
        serde_json::to_string(&ValidationStatus::Passed).expect("json"),
        "\"passed\""
    );
    let status: ValidationStatus = serde_json::from_str("\"pending\"").expect("parse");
    assert_eq!(status, ValidationStatus::Pending);
}

#[test]
fn id_newtypes_are_transparent_integers() {
    assert_eq!(serde_json::to_string(&NormId(7)).expect("json"), "7");
    let id: ValidationId = serde_json::from_str("42").expect("parse");
    assert_eq!(id, ValidationId(42));
}

#[test]
fn norm_round_trips_through_json() {
    let norm = Norm {
        id: NormId(3),
        category: Category::Pins,
        parameter_name: "Hardness".to_string(),
        min_value: Some(50.0),
        max_value: Some(65.0),
        unit: "HRC".to_string(),
        kind: PropertyKind::Mechanical,
        version: 2,
    };
    let json = serde_json::to_string(&norm).expect("json");
    let back: Norm = serde_json::from_str(&json).expect("parse");
    assert_eq!(back, norm);
}

#[test]
fn record_carries_unix_ms_timestamp() {
    let record = ValidationRecord {
        id: ValidationId(1),
        category: Category::Attachment,
        certificate_name: "cert-S355.pdf".to_string(),
        submitted_at_ms: 1_700_000_000_000,
        status: ValidationStatus::Pending,
    };
    let value = serde_json::to_value(&record).expect("json");
    assert_eq!(value["submitted_at_ms"], 1_700_000_000_000_u64);
    assert_eq!(value["status"], "pending");
}
