use std::collections::HashMap;
use std::time::Instant;

use axum::http::Method;
use common::db::Session;
use common::errors::ActionError;
use common::event::{ApiEvent, ApiResponse};
use common::telemetry;
use thiserror::Error;
use uuid::Uuid;

use crate::handlers;
use crate::state::AppState;

/// Every routable catalog action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    DivisionSegments,
    UnitOperations,
    Equipment,
    DivisionSegmentCache,
    BuyerEnquiry,
}

impl Route {
    pub const ALL: [Route; 5] = [
        Route::DivisionSegments,
        Route::UnitOperations,
        Route::Equipment,
        Route::DivisionSegmentCache,
        Route::BuyerEnquiry,
    ];

    pub fn method(&self) -> Method {
        match self {
            Route::BuyerEnquiry => Method::POST,
            _ => Method::GET,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::DivisionSegments => "/get/div/mktseg",
            Route::UnitOperations => "/get/div/mktseg/unitop",
            Route::Equipment => "/get/div/mktseg/unitop/equip",
            Route::DivisionSegmentCache => "/get/div/mktseg/cache",
            Route::BuyerEnquiry => "/buyer/enquiry",
        }
    }

    /// Label for logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Route::DivisionSegments => "division_segments",
            Route::UnitOperations => "unit_operations",
            Route::Equipment => "equipment",
            Route::DivisionSegmentCache => "division_segment_cache",
            Route::BuyerEnquiry => "buyer_enquiry",
        }
    }

    pub fn routing_key(&self) -> String {
        routing_key(self.method().as_str(), self.path())
    }

    async fn handle(
        self,
        state: &AppState,
        event: &ApiEvent,
        session: &mut dyn Session,
    ) -> Result<ApiResponse, ActionError> {
        match self {
            Route::DivisionSegments => handlers::catalog::list_division_segments(state, session).await,
            Route::UnitOperations => handlers::catalog::list_unit_operations(event, session).await,
            Route::Equipment => handlers::catalog::list_equipment(state, event, session).await,
            Route::DivisionSegmentCache => handlers::cache::division_segment_cache(state).await,
            Route::BuyerEnquiry => handlers::enquiry::submit_enquiry(event, session).await,
        }
    }
}

/// Strip outer separators and join the remaining segments with `_`.
/// Runs of `/` collapse into one separator.
pub fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn routing_key(method: &str, path: &str) -> String {
    format!("{}_{}", method.to_lowercase(), normalize_path(path))
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("Duplicate routing key '{key}' for {first:?} and {second:?}")]
    DuplicateKey { key: String, first: Route, second: Route },
}

/// Static (method, path) → action table, verified once at startup
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: HashMap<String, Route>,
}

impl RouteTable {
    pub fn new() -> Result<Self, RouteTableError> {
        Self::from_routes(&Route::ALL)
    }

    fn from_routes(routes: &[Route]) -> Result<Self, RouteTableError> {
        let mut table = HashMap::with_capacity(routes.len());
        for &route in routes {
            let key = route.routing_key();
            if let Some(&first) = table.get(&key) {
                return Err(RouteTableError::DuplicateKey {
                    key,
                    first,
                    second: route,
                });
            }
            table.insert(key, route);
        }
        Ok(Self { routes: table })
    }

    pub fn resolve(&self, method: &str, path: &str) -> Option<Route> {
        self.routes.get(&routing_key(method, path)).copied()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Resolve, run and envelope one catalog request.
///
/// Unroutable requests never open a session. Routed requests hold exactly
/// one session, dropped before the response is returned.
#[tracing::instrument(
    skip_all,
    fields(method = %event.http_method, path = %event.path, request_id = %Uuid::new_v4())
)]
pub async fn dispatch(state: &AppState, event: &ApiEvent) -> ApiResponse {
    let started = Instant::now();

    let Some(route) = state.routes.resolve(&event.http_method, &event.path) else {
        tracing::info!("Route not found");
        return ActionError::RouteNotFound.into_response();
    };

    let response = match run(state, route, event).await {
        Ok(response) => response,
        Err(err) => {
            log_failure(route, &err);
            err.into_response()
        }
    };

    tracing::info!(
        route = route.name(),
        status = response.status_code,
        "Request completed"
    );
    telemetry::record_request(route.name(), response.status_code, started.elapsed());
    response
}

async fn run(state: &AppState, route: Route, event: &ApiEvent) -> Result<ApiResponse, ActionError> {
    let mut session = state.sessions.open_session().await?;
    route.handle(state, event, session.as_mut()).await
}

fn log_failure(route: Route, err: &ActionError) {
    match err {
        ActionError::Validation(errors) => {
            tracing::info!(route = route.name(), failed_fields = errors.len(), "Validation failed");
        }
        ActionError::RouteNotFound
        | ActionError::CacheUnavailable(_)
        | ActionError::NoApprovedContent { .. } => {
            tracing::warn!(route = route.name(), kind = err.kind(), error = %err, "Not found");
        }
        ActionError::DependencyUnavailable(_)
        | ActionError::SigningFailure(_)
        | ActionError::Internal(_) => {
            tracing::error!(route = route.name(), kind = err.kind(), error = %err, "Request failed");
        }
    }
}
