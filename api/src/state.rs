use std::sync::Arc;

use common::config::ObjectStorageConfig;
use common::db::SessionFactory;
use common::storage::ObjectStore;

use crate::routes::RouteTable;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub sessions: Arc<dyn SessionFactory>,
    pub objects: Arc<dyn ObjectStore>,
    pub storage: Arc<ObjectStorageConfig>,
}

impl AppState {
    /// Create a new AppState instance
    pub fn new(
        routes: RouteTable,
        sessions: Arc<dyn SessionFactory>,
        objects: Arc<dyn ObjectStore>,
        storage: ObjectStorageConfig,
    ) -> Self {
        Self {
            routes: Arc::new(routes),
            sessions,
            objects,
            storage: Arc::new(storage),
        }
    }
}
