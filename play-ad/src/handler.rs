use chrono::DateTime;
use chrono_tz::Tz;
use common::db::Session;
use common::errors::ActionError;
use common::event::ApiResponse;
use serde_json::json;

use crate::state::AppState;

/// Slot label for the hour `now` falls in, e.g. `09:00`
pub fn hour_label(now: &DateTime<Tz>) -> String {
    now.format("%H:00").to_string()
}

/// Resolve the approved creative for the slot containing `now` and return a
/// temporary URL for it.
#[tracing::instrument(skip(state, session), fields(slot))]
pub async fn get_play_ad(
    state: &AppState,
    session: &mut dyn Session,
    now: DateTime<Tz>,
) -> Result<ApiResponse, ActionError> {
    let date = now.date_naive();
    let slot = hour_label(&now);
    tracing::Span::current().record("slot", slot.as_str());

    let key = session
        .approved_slot_key(date, &slot)
        .await?
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ActionError::NoApprovedContent {
            date,
            hour: slot.clone(),
        })?;

    let url = state
        .objects
        .presign_get(&key, state.url_expiry_seconds)
        .await
        .map_err(|e| ActionError::SigningFailure(e.to_string()))?;

    tracing::info!(key = %key, "Serving approved ad");
    Ok(ApiResponse::ok(&json!({
        "url": url,
        "timestamp": now.to_rfc3339(),
        "slot": slot,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_hour_label_truncates_to_the_hour() {
        let now = chrono_tz::UTC.with_ymd_and_hms(2024, 3, 5, 9, 59, 59).unwrap();
        assert_eq!(hour_label(&now), "09:00");

        let midnight = chrono_tz::UTC.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap();
        assert_eq!(hour_label(&midnight), "00:00");
    }

    #[test]
    fn test_hour_label_follows_the_zone() {
        let utc = chrono_tz::UTC.with_ymd_and_hms(2024, 3, 5, 20, 30, 0).unwrap();
        let kolkata = utc.with_timezone(&chrono_tz::Asia::Kolkata);
        assert_eq!(hour_label(&kolkata), "02:00");
        assert_eq!(kolkata.date_naive().to_string(), "2024-03-06");
    }
}
