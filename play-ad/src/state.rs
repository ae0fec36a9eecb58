use std::sync::Arc;

use chrono_tz::Tz;
use common::db::SessionFactory;
use common::storage::ObjectStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionFactory>,
    pub objects: Arc<dyn ObjectStore>,
    /// Zone the current slot is read in
    pub timezone: Tz,
    pub url_expiry_seconds: u32,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionFactory>,
        objects: Arc<dyn ObjectStore>,
        timezone: Tz,
        url_expiry_seconds: u32,
    ) -> Self {
        Self {
            sessions,
            objects,
            timezone,
            url_expiry_seconds,
        }
    }
}
