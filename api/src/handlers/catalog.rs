// Catalog hierarchy listings: division → market segment → unit operation → equipment

use common::db::Session;
use common::errors::ActionError;
use common::event::{ApiEvent, ApiResponse};
use common::models::{DivisionSegmentView, EquipmentQuery, EquipmentView, UnitOperationQuery};

use crate::handlers::{distinct, listing_response, signing_failure};
use crate::state::AppState;

/// List every division / market segment pair with a signed segment image
#[tracing::instrument(skip_all)]
pub async fn list_division_segments(
    state: &AppState,
    session: &mut dyn Session,
) -> Result<ApiResponse, ActionError> {
    let rows = distinct(session.division_segments().await?);
    let expiry = state.storage.listing_url_expiry_seconds;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let image_url = state
            .objects
            .presign_optional(row.image_url.as_deref(), expiry)
            .await
            .map_err(signing_failure)?;

        views.push(DivisionSegmentView {
            division_id: row.division_id,
            division_name: row.division_name,
            market_segment_id: row.market_segment_id,
            market_segment_name: row.market_segment_name,
            image_url,
        });
    }

    tracing::debug!(count = views.len(), "Listed division segments");
    listing_response(&views)
}

/// List unit operations for a division and market segment
#[tracing::instrument(skip_all)]
pub async fn list_unit_operations(
    event: &ApiEvent,
    session: &mut dyn Session,
) -> Result<ApiResponse, ActionError> {
    let query = UnitOperationQuery::from_params(event.query_string_parameters.as_ref())?;
    let rows = distinct(session.unit_operations(&query).await?);

    tracing::debug!(
        division_id = query.division_id,
        market_segment_id = query.market_segment_id,
        count = rows.len(),
        "Listed unit operations"
    );
    listing_response(&rows)
}

/// List equipment for a division, market segment and unit operation
#[tracing::instrument(skip_all)]
pub async fn list_equipment(
    state: &AppState,
    event: &ApiEvent,
    session: &mut dyn Session,
) -> Result<ApiResponse, ActionError> {
    let query = EquipmentQuery::from_params(event.query_string_parameters.as_ref())?;
    let rows = distinct(session.equipment(&query).await?);
    let expiry = state.storage.listing_url_expiry_seconds;

    let mut views = Vec::with_capacity(rows.len());
    for row in rows {
        let machine_image_url = state
            .objects
            .presign_optional(row.machine_image_url.as_deref(), expiry)
            .await
            .map_err(signing_failure)?;

        views.push(EquipmentView {
            division_id: row.division_id,
            machine_name: row.machine_name,
            id: row.id,
            machine_image_url,
        });
    }

    tracing::debug!(
        division_id = query.division_id,
        unit_operation_id = query.unit_operation_id,
        count = views.len(),
        "Listed equipment"
    );
    listing_response(&views)
}
