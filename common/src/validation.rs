// Request validation: coerces query parameters and JSON bodies into typed
// inputs, collecting every field failure instead of stopping at the first.

use crate::models::{Archive, EquipmentQuery, NewBuyerEnquiry, UnitOperationQuery};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const FIELD_REQUIRED: &str = "field required";
pub const NOT_AN_INTEGER: &str = "must be an integer";
pub const OUT_OF_RANGE: &str = "integer out of range";
pub const NOT_AN_OBJECT: &str = "must be an object or null";

/// One failed field with a human-readable reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Accumulates field failures across a whole schema
#[derive(Debug, Default)]
struct Collector {
    errors: Vec<FieldError>,
}

impl Collector {
    fn fail(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(value())
        } else {
            Err(self.errors)
        }
    }

    fn query_int(&mut self, params: &HashMap<String, String>, field: &str) -> i32 {
        match params.get(field) {
            None => {
                self.fail(field, FIELD_REQUIRED);
                0
            }
            Some(raw) => match parse_int_str(raw) {
                Ok(value) => value,
                Err(message) => {
                    self.fail(field, message);
                    0
                }
            },
        }
    }

    fn body_int(&mut self, body: &Map<String, Value>, field: &str) -> i32 {
        match body.get(field) {
            None => {
                self.fail(field, FIELD_REQUIRED);
                0
            }
            Some(value) => match coerce_int(value) {
                Ok(value) => value,
                Err(message) => {
                    self.fail(field, message);
                    0
                }
            },
        }
    }

    fn body_optional_int(&mut self, body: &Map<String, Value>, field: &str) -> Option<i32> {
        match body.get(field) {
            None | Some(Value::Null) => None,
            Some(value) => match coerce_int(value) {
                Ok(value) => Some(value),
                Err(message) => {
                    self.fail(field, message);
                    None
                }
            },
        }
    }

    fn body_optional_object(
        &mut self,
        body: &Map<String, Value>,
        field: &str,
    ) -> Option<Map<String, Value>> {
        match body.get(field) {
            None | Some(Value::Null) => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => {
                self.fail(field, NOT_AN_OBJECT);
                None
            }
        }
    }
}

fn parse_int_str(raw: &str) -> Result<i32, &'static str> {
    let parsed: i64 = raw.trim().parse().map_err(|_| NOT_AN_INTEGER)?;
    i32::try_from(parsed).map_err(|_| OUT_OF_RANGE)
}

/// Lax integer coercion: integers, integral floats and numeric strings
fn coerce_int(value: &Value) -> Result<i32, &'static str> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return i32::try_from(i).map_err(|_| OUT_OF_RANGE);
            }
            if n.as_u64().is_some() {
                return Err(OUT_OF_RANGE);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.is_finite() => {
                    if f < i32::MIN as f64 || f > i32::MAX as f64 {
                        Err(OUT_OF_RANGE)
                    } else {
                        Ok(f as i32)
                    }
                }
                _ => Err(NOT_AN_INTEGER),
            }
        }
        Value::String(s) => parse_int_str(s),
        _ => Err(NOT_AN_INTEGER),
    }
}

impl UnitOperationQuery {
    pub fn from_params(params: Option<&HashMap<String, String>>) -> Result<Self, Vec<FieldError>> {
        let empty = HashMap::new();
        let params = params.unwrap_or(&empty);

        let mut collector = Collector::default();
        let division_id = collector.query_int(params, "divisionId");
        let market_segment_id = collector.query_int(params, "marketSegmentId");

        collector.finish(|| Self {
            division_id,
            market_segment_id,
        })
    }
}

impl EquipmentQuery {
    pub fn from_params(params: Option<&HashMap<String, String>>) -> Result<Self, Vec<FieldError>> {
        let empty = HashMap::new();
        let params = params.unwrap_or(&empty);

        let mut collector = Collector::default();
        let division_id = collector.query_int(params, "divisionId");
        let market_segment_id = collector.query_int(params, "marketSegmentId");
        let unit_operation_id = collector.query_int(params, "unitOperationId");

        collector.finish(|| Self {
            division_id,
            market_segment_id,
            unit_operation_id,
        })
    }
}

impl NewBuyerEnquiry {
    /// Parse and validate an enquiry body. A missing body counts as `{}`.
    pub fn from_body(body: Option<&str>) -> Result<Self, Vec<FieldError>> {
        let raw = match body {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => "{}",
        };

        let value: Value = serde_json::from_str(raw)
            .map_err(|e| vec![FieldError::new("body", format!("invalid JSON: {e}"))])?;
        let Value::Object(body) = value else {
            return Err(vec![FieldError::new("body", "must be a JSON object")]);
        };

        let mut collector = Collector::default();
        let buyer_id = collector.body_int(&body, "buyer_id");
        let market_segment_id = collector.body_int(&body, "market_segment_id");
        let unit_operation_id = collector.body_int(&body, "unit_operation_id");
        let equipment_id = collector.body_int(&body, "equipment_id");
        let capacity_id = collector.body_optional_int(&body, "capacity_id");
        let e_registered_details = collector.body_optional_object(&body, "e_registered_details");

        collector.finish(|| Self {
            buyer_id,
            market_segment_id,
            unit_operation_id,
            equipment_id,
            capacity_id,
            e_registered_details,
            archive: Archive::No,
        })
    }
}
