use common::db::Session;
use common::errors::ActionError;
use common::event::{ApiEvent, ApiResponse};
use common::models::NewBuyerEnquiry;
use serde_json::json;

/// Validate the body and persist exactly one enquiry row.
///
/// Referenced equipment, segment and unit-operation ids are trusted as sent.
#[tracing::instrument(skip_all)]
pub async fn submit_enquiry(
    event: &ApiEvent,
    session: &mut dyn Session,
) -> Result<ApiResponse, ActionError> {
    let enquiry = NewBuyerEnquiry::from_body(event.body.as_deref())?;
    let id = session.insert_enquiry(&enquiry).await?;

    tracing::info!(
        enquiry_id = id,
        buyer_id = enquiry.buyer_id,
        equipment_id = enquiry.equipment_id,
        "Enquiry submitted"
    );
    Ok(ApiResponse::created(&json!({
        "message": "Enquiry submitted",
        "id": id,
    })))
}
