// In-memory stand-ins for the relational store and object storage

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use common::config::ObjectStorageConfig;
use common::db::{Session, SessionFactory};
use common::errors::{DatabaseError, StorageError};
use common::event::{ApiEvent, ApiResponse};
use common::models::{
    CapabilityFact, DivisionSegmentRow, EquipmentDetail, EquipmentQuery, EquipmentRow,
    MarketSegment, NewBuyerEnquiry, UnitOperationQuery, UnitOperationRow,
};
use common::storage::ObjectStore;

use catalog_api::{dispatch, AppState, RouteTable};

#[derive(Default)]
pub struct CatalogData {
    pub facts: Vec<CapabilityFact>,
    pub segments: Vec<MarketSegment>,
    pub equipment: Vec<EquipmentDetail>,
    pub enquiries: Vec<(u64, NewBuyerEnquiry)>,
}

/// Relational store fake. Joins are computed without DISTINCT so the
/// handlers' own deduplication is exercised.
#[derive(Default)]
pub struct InMemoryStore {
    pub data: Mutex<CatalogData>,
    pub opened: AtomicUsize,
    pub closed: AtomicUsize,
    pub queries: AtomicUsize,
    pub unavailable: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn enquiry_count(&self) -> usize {
        self.data.lock().unwrap().enquiries.len()
    }
}

pub struct InMemoryFactory(pub Arc<InMemoryStore>);

#[async_trait]
impl SessionFactory for InMemoryFactory {
    async fn open_session(&self) -> Result<Box<dyn Session>, DatabaseError> {
        self.0.opened.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(InMemorySession {
            store: self.0.clone(),
        }))
    }
}

pub struct InMemorySession {
    store: Arc<InMemoryStore>,
}

impl InMemorySession {
    fn begin_query(&self) -> Result<(), DatabaseError> {
        self.store.queries.fetch_add(1, Ordering::SeqCst);
        if self.store.unavailable.load(Ordering::SeqCst) {
            return Err(DatabaseError::ConnectionFailed(
                "Can't connect to MySQL server".to_string(),
            ));
        }
        Ok(())
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.store.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Session for InMemorySession {
    async fn division_segments(&mut self) -> Result<Vec<DivisionSegmentRow>, DatabaseError> {
        self.begin_query()?;
        let data = self.store.data.lock().unwrap();
        let mut rows = Vec::new();
        for fact in &data.facts {
            for segment in &data.segments {
                if fact.market_segment_id == Some(segment.id) {
                    rows.push(DivisionSegmentRow {
                        division_id: fact.division_id,
                        division_name: fact.division_name.clone(),
                        market_segment_id: fact.market_segment_id,
                        market_segment_name: fact.market_segment_name.clone(),
                        image_url: segment.image_url.clone(),
                    });
                }
            }
        }
        Ok(rows)
    }

    async fn unit_operations(
        &mut self,
        query: &UnitOperationQuery,
    ) -> Result<Vec<UnitOperationRow>, DatabaseError> {
        self.begin_query()?;
        let data = self.store.data.lock().unwrap();
        Ok(data
            .facts
            .iter()
            .filter(|f| {
                f.division_id == Some(query.division_id)
                    && f.market_segment_id == Some(query.market_segment_id)
            })
            .map(|f| UnitOperationRow {
                division_id: f.division_id,
                division_name: f.division_name.clone(),
                unit_operation_id: f.unit_operation_id,
                unit_operation: f.unit_operation.clone(),
            })
            .collect())
    }

    async fn equipment(
        &mut self,
        query: &EquipmentQuery,
    ) -> Result<Vec<EquipmentRow>, DatabaseError> {
        self.begin_query()?;
        let data = self.store.data.lock().unwrap();
        let mut rows = Vec::new();
        for fact in &data.facts {
            if fact.division_id != Some(query.division_id)
                || fact.market_segment_id != Some(query.market_segment_id)
                || fact.unit_operation_id != Some(query.unit_operation_id)
            {
                continue;
            }
            for equipment in data.equipment.iter().filter(|e| e.id == fact.id) {
                rows.push(EquipmentRow {
                    division_id: fact.division_id,
                    machine_name: equipment.machine_name.clone(),
                    id: equipment.id,
                    machine_image_url: equipment.machine_image_url.clone(),
                });
            }
        }
        Ok(rows)
    }

    async fn insert_enquiry(&mut self, enquiry: &NewBuyerEnquiry) -> Result<u64, DatabaseError> {
        self.begin_query()?;
        if self.store.fail_writes.load(Ordering::SeqCst) {
            return Err(DatabaseError::QueryFailed("Deadlock found".to_string()));
        }
        let mut data = self.store.data.lock().unwrap();
        let id = data.enquiries.len() as u64 + 1;
        data.enquiries.push((id, enquiry.clone()));
        Ok(id)
    }

    async fn approved_slot_key(
        &mut self,
        _booking_date: NaiveDate,
        _hour: &str,
    ) -> Result<Option<String>, DatabaseError> {
        self.begin_query()?;
        Ok(None)
    }
}

/// Deterministic signer with an in-memory object map
#[derive(Default)]
pub struct FakeObjects {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    pub signed: Mutex<Vec<(String, u32)>>,
    pub fail_signing: AtomicBool,
}

impl FakeObjects {
    pub fn put(&self, key: &str, data: impl Into<Vec<u8>>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), data.into());
    }

    pub fn sign_calls(&self) -> usize {
        self.signed.lock().unwrap().len()
    }
}

pub fn signed_url(key: &str, expiry_secs: u32) -> String {
    format!(
        "https://valuesmart.s3.amazonaws.com/{key}?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Expires={expiry_secs}&X-Amz-Signature=abc123"
    )
}

#[async_trait]
impl ObjectStore for FakeObjects {
    async fn presign_get(&self, key: &str, expiry_secs: u32) -> Result<String, StorageError> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(StorageError::PresignFailed("credentials expired".to_string()));
        }
        self.signed
            .lock()
            .unwrap()
            .push((key.to_string(), expiry_secs));
        Ok(signed_url(key, expiry_secs))
    }

    async fn get_object(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
    pub objects: Arc<FakeObjects>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_objects(Arc::new(FakeObjects::default()))
    }

    pub fn with_objects(objects: Arc<FakeObjects>) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let state = app_state(store.clone(), objects.clone());
        Self {
            state,
            store,
            objects,
        }
    }

    pub async fn call(&self, event: ApiEvent) -> ApiResponse {
        dispatch(&self.state, &event).await
    }

    pub fn sessions_balanced(&self) -> bool {
        self.store.opened.load(Ordering::SeqCst) == self.store.closed.load(Ordering::SeqCst)
    }
}

pub fn app_state(store: Arc<InMemoryStore>, objects: Arc<dyn ObjectStore>) -> AppState {
    AppState::new(
        RouteTable::new().expect("route table"),
        Arc::new(InMemoryFactory(store)),
        objects,
        ObjectStorageConfig::default(),
    )
}

pub fn fact(
    id: i32,
    division: (i32, &str),
    segment: (i32, &str),
    unit_operation: (i32, &str),
) -> CapabilityFact {
    CapabilityFact {
        id,
        division_id: Some(division.0),
        division_name: Some(division.1.to_string()),
        market_segment_id: Some(segment.0),
        market_segment_name: Some(segment.1.to_string()),
        unit_operation_id: Some(unit_operation.0),
        unit_operation: Some(unit_operation.1.to_string()),
    }
}

/// Two divisions, three segments, a repeated fact row and one segment
/// without an image.
pub fn seed_catalog(store: &InMemoryStore) {
    let mut data = store.data.lock().unwrap();
    data.facts = vec![
        fact(1, (10, "Process"), (100, "Pharma"), (1000, "Mixing")),
        fact(2, (10, "Process"), (100, "Pharma"), (1001, "Drying")),
        fact(3, (10, "Process"), (100, "Pharma"), (1000, "Mixing")),
        fact(4, (10, "Process"), (101, "Food"), (1002, "Milling")),
        fact(5, (20, "Packaging"), (102, "Cosmetics"), (1003, "Filling")),
    ];
    data.segments = vec![
        MarketSegment {
            id: 100,
            image_url: Some("segments/pharma.png".to_string()),
        },
        MarketSegment {
            id: 101,
            image_url: Some(String::new()),
        },
        MarketSegment {
            id: 102,
            image_url: None,
        },
    ];
    data.equipment = vec![
        EquipmentDetail {
            id: 1,
            machine_name: Some("Ribbon Blender".to_string()),
            machine_image_url: Some("equipment/ribbon.png".to_string()),
        },
        EquipmentDetail {
            id: 3,
            machine_name: Some("V Blender".to_string()),
            machine_image_url: None,
        },
    ];
}
