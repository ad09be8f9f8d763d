//! Serde roundtrip and JsonSchema validation tests for wire-facing types.

use noteset_core::entities::*;
use noteset_core::enums::RowOp;
use noteset_core::fields::FieldErrors;
use noteset_core::reconcile::ReconcilePlan;
use noteset_core::responses::*;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

roundtrip_and_validate!(
    submission_with_draft_roundtrip,
    NoteSubmission,
    NoteSubmission::new(vec![
        SubmittedNote::existing(1, "buy milk"),
        SubmittedNote::draft(""),
    ])
);

roundtrip_and_validate!(
    apply_report_roundtrip,
    ApplyReport,
    ApplyReport {
        outcomes: vec![
            RowOutcome::new(RowOp::Delete, Some(2), RowStatus::Applied),
            RowOutcome::new(RowOp::Upsert, Some(5), RowStatus::Absent),
            RowOutcome::new(
                RowOp::Upsert,
                Some(1),
                RowStatus::Failed {
                    message: "CHECK constraint failed".into(),
                },
            ),
            RowOutcome::new(RowOp::Create, Some(9), RowStatus::Applied),
        ],
    }
);

roundtrip_and_validate!(
    reconcile_plan_roundtrip,
    ReconcilePlan,
    ReconcilePlan {
        to_delete: vec![3, 4],
        to_upsert: vec![Note::new(1, "kept")],
        to_create: vec!["new".into()],
    }
);

#[test]
fn submission_schema_treats_id_as_optional() {
    let schema = serde_json::to_value(schema_for!(NoteSubmission)).unwrap();
    let instance = serde_json::json!({ "notes": [{ "content": "no id yet" }] });
    assert!(validate_against_schema(&schema, &instance).is_empty());

    let missing_content = serde_json::json!({ "notes": [{ "id": 1 }] });
    assert_eq!(validate_against_schema(&schema, &missing_content).len(), 1);
}

#[test]
fn field_errors_accept_any_path_map() {
    let schema = serde_json::to_value(schema_for!(FieldErrors)).unwrap();
    let instance = serde_json::json!({ "notes[0].content": ["Required"], "": ["bad form"] });
    assert!(validate_against_schema(&schema, &instance).is_empty());
}
