// Cached division / market segment tree served straight from object storage

use common::errors::ActionError;
use common::event::ApiResponse;
use serde_json::{json, Value};

use crate::state::AppState;

const SEGMENTS_FIELD: &str = "marketSegments";
const IMAGE_FIELD: &str = "imageUrl";

/// Serve the cached tree with every segment image key signed.
///
/// Any failure (missing object, bad JSON, wrong shape, signing error) is
/// reported to the caller as the same cache miss.
#[tracing::instrument(skip_all, fields(key = %state.storage.cache_key))]
pub async fn division_segment_cache(state: &AppState) -> Result<ApiResponse, ActionError> {
    let tree = load_signed_tree(state).await.map_err(|reason| {
        tracing::warn!(reason = %reason, "Division segment cache unavailable");
        ActionError::CacheUnavailable(reason)
    })?;

    Ok(ApiResponse::ok(&json!({ "response": tree })))
}

async fn load_signed_tree(state: &AppState) -> Result<Value, String> {
    let data = state
        .objects
        .get_object(&state.storage.cache_key)
        .await
        .map_err(|e| e.to_string())?;
    let mut tree: Value =
        serde_json::from_slice(&data).map_err(|e| format!("invalid cache JSON: {e}"))?;

    let expiry = state.storage.cache_url_expiry_seconds;
    let divisions = tree
        .as_array_mut()
        .ok_or_else(|| "cache root is not an array".to_string())?;

    for division in divisions.iter_mut() {
        let division = division
            .as_object_mut()
            .ok_or_else(|| "division entry is not an object".to_string())?;
        let Some(segments) = division.get_mut(SEGMENTS_FIELD) else {
            continue;
        };
        let segments = segments
            .as_array_mut()
            .ok_or_else(|| format!("{SEGMENTS_FIELD} is not an array"))?;

        for segment in segments.iter_mut() {
            let segment = segment
                .as_object_mut()
                .ok_or_else(|| "market segment entry is not an object".to_string())?;
            let key = match segment.get(IMAGE_FIELD) {
                Some(Value::String(key)) if !key.is_empty() => key.clone(),
                None | Some(Value::Null) | Some(Value::String(_)) => continue,
                Some(other) => return Err(format!("{IMAGE_FIELD} is not a string: {other}")),
            };

            let url = state
                .objects
                .presign_get(&key, expiry)
                .await
                .map_err(|e| e.to_string())?;
            segment.insert(IMAGE_FIELD.to_string(), Value::String(url));
        }
    }

    Ok(tree)
}
