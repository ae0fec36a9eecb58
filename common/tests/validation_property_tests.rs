// Property-based tests for request validation and the error envelope

use common::errors::ActionError;
use common::models::{Archive, EquipmentQuery, NewBuyerEnquiry, UnitOperationQuery};
use common::validation::FieldError;
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::HashMap;

const ENQUIRY_FIELDS: [&str; 4] = [
    "buyer_id",
    "market_segment_id",
    "unit_operation_id",
    "equipment_id",
];

fn int_like(n: i32) -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(json!(n)),
        Just(json!(n.to_string())),
        Just(json!(n as f64)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Any i32 in any accepted representation parses to the same value
    #[test]
    fn valid_params_parse_exactly(division in any::<i32>(), segment in any::<i32>(), op in any::<i32>()) {
        let params: HashMap<String, String> = [
            ("divisionId", division),
            ("marketSegmentId", segment),
            ("unitOperationId", op),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let unit = UnitOperationQuery::from_params(Some(&params)).unwrap();
        prop_assert_eq!((unit.division_id, unit.market_segment_id), (division, segment));

        let equipment = EquipmentQuery::from_params(Some(&params)).unwrap();
        prop_assert_eq!(equipment.unit_operation_id, op);
    }

    // Removing any subset of required fields reports exactly that subset, in order
    #[test]
    fn missing_enquiry_fields_are_all_reported(
        mask in prop::collection::vec(any::<bool>(), 4),
        value in int_like(7),
    ) {
        let mut body = Map::new();
        let mut expected = Vec::new();
        for (field, keep) in ENQUIRY_FIELDS.iter().zip(&mask) {
            if *keep {
                body.insert(field.to_string(), value.clone());
            } else {
                expected.push(*field);
            }
        }

        let result = NewBuyerEnquiry::from_body(Some(&Value::Object(body).to_string()));
        if expected.is_empty() {
            let enquiry = result.unwrap();
            prop_assert_eq!(enquiry.archive, Archive::No);
            prop_assert_eq!(enquiry.equipment_id, 7);
        } else {
            let errors = result.unwrap_err();
            let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
            prop_assert_eq!(fields, expected);
        }
    }

    // Fractional or non-numeric values never coerce
    #[test]
    fn non_integers_are_rejected(
        fraction in 0.01f64..0.99,
        word in "[a-z]{1,10}",
    ) {
        let body = json!({
            "buyer_id": 1.0 + fraction,
            "market_segment_id": word,
            "unit_operation_id": 3,
            "equipment_id": 4,
        });
        let errors = NewBuyerEnquiry::from_body(Some(&body.to_string())).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        prop_assert_eq!(fields, vec!["buyer_id", "market_segment_id"]);
    }

    // Validation envelopes list every failure and nothing else
    #[test]
    fn validation_envelope_lists_every_error(names in prop::collection::vec("[a-zA-Z]{1,12}", 1..6)) {
        let errors: Vec<FieldError> = names.iter().map(|n| FieldError::new(n.as_str(), "field required")).collect();
        let response = ActionError::from(errors).into_response();

        prop_assert_eq!(response.status_code, 400);
        let body = response.body_json().unwrap();
        let listed: Vec<&str> = body["error"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        prop_assert_eq!(listed, names.iter().map(String::as_str).collect::<Vec<_>>());
    }
}

#[test]
fn internal_errors_never_leak_detail() {
    let secret = "Access denied for user 'valuesmart'@'10.0.0.4' (using password: YES)";
    for err in [
        ActionError::Internal(secret.to_string()),
        ActionError::DependencyUnavailable(secret.to_string()),
        ActionError::SigningFailure(secret.to_string()),
        ActionError::CacheUnavailable(secret.to_string()),
    ] {
        let response = err.into_response();
        assert!(!response.body.contains("valuesmart"));
        assert!(!response.body.contains("10.0.0.4"));
    }
}
