use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{Method, Uri},
    Router,
};
use common::event::{ApiEvent, ApiResponse};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::routes::dispatch;
use crate::state::AppState;

/// Create the HTTP application.
///
/// Routing is owned by the catalog route table, so every request lands in a
/// single fallback that converts it into an [`ApiEvent`].
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_request)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn handle_request(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    query: Option<Query<HashMap<String, String>>>,
    body: Bytes,
) -> ApiResponse {
    let event = to_event(method, &uri, query.map(|Query(params)| params), &body);
    dispatch(&state, &event).await
}

pub fn to_event(
    method: Method,
    uri: &Uri,
    params: Option<HashMap<String, String>>,
    body: &[u8],
) -> ApiEvent {
    ApiEvent {
        http_method: method.as_str().to_string(),
        path: uri.path().to_string(),
        query_string_parameters: params.filter(|params| !params.is_empty()),
        body: (!body.is_empty()).then(|| String::from_utf8_lossy(body).into_owned()),
    }
}
