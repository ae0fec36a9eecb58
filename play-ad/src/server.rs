use std::time::Instant;

use axum::{extract::State, Router};
use common::errors::ActionError;
use common::event::ApiResponse;
use common::telemetry;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::handler::get_play_ad;
use crate::state::AppState;

/// Every request, whatever its method or path, is a slot lookup
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .fallback(handle_request)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

async fn handle_request(State(state): State<AppState>) -> ApiResponse {
    play(&state).await
}

/// Run one lookup against the current time in the configured zone
#[tracing::instrument(skip_all, fields(request_id = %Uuid::new_v4()))]
pub async fn play(state: &AppState) -> ApiResponse {
    let started = Instant::now();
    let now = chrono::Utc::now().with_timezone(&state.timezone);

    let response = match run(state, now).await {
        Ok(response) => response,
        Err(err) => {
            match &err {
                ActionError::NoApprovedContent { .. } => {
                    tracing::info!(error = %err, "No approved ad for slot");
                }
                _ => tracing::error!(kind = err.kind(), error = %err, "Ad slot lookup failed"),
            }
            err.into_response()
        }
    };

    tracing::debug!(
        status = response.status_code,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Ad slot request completed"
    );
    telemetry::record_ad_slot_request(response.status_code);
    response
}

async fn run(
    state: &AppState,
    now: chrono::DateTime<chrono_tz::Tz>,
) -> Result<ApiResponse, ActionError> {
    let mut session = state.sessions.open_session().await?;
    get_play_ad(state, session.as_mut(), now).await
}
