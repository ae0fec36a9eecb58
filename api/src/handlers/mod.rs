pub mod cache;
pub mod catalog;
pub mod enquiry;

use std::collections::HashSet;
use std::hash::Hash;

use common::errors::{ActionError, StorageError};
use common::event::ApiResponse;
use serde::Serialize;

/// Drop repeated rows, keeping the first occurrence of each
pub fn distinct<T: Eq + Hash + Clone>(rows: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(rows.len());
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}

/// Standard listing envelope: `{"response": [...]}` at 200
pub fn listing_response<T: Serialize>(rows: &[T]) -> Result<ApiResponse, ActionError> {
    let rows = serde_json::to_value(rows).map_err(|e| ActionError::Internal(e.to_string()))?;
    Ok(ApiResponse::ok(&serde_json::json!({ "response": rows })))
}

pub(crate) fn signing_failure(err: StorageError) -> ActionError {
    ActionError::SigningFailure(err.to_string())
}
