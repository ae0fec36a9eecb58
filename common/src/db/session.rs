// Scoped database sessions: one per invocation, released on drop

use crate::errors::DatabaseError;
use crate::models::{
    DivisionSegmentRow, EquipmentQuery, EquipmentRow, NewBuyerEnquiry, UnitOperationQuery,
    UnitOperationRow, APPROVED,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::mysql::{MySql, MySqlPool};
use sqlx::pool::PoolConnection;
use sqlx::Connection;
use tracing::instrument;

/// Hands out sessions. Implemented by the connection manager in production
/// and by in-memory stores in tests.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open_session(&self) -> Result<Box<dyn Session>, DatabaseError>;
}

/// Every query the catalog and ad-slot functions run
#[async_trait]
pub trait Session: Send {
    async fn division_segments(&mut self) -> Result<Vec<DivisionSegmentRow>, DatabaseError>;

    async fn unit_operations(
        &mut self,
        query: &UnitOperationQuery,
    ) -> Result<Vec<UnitOperationRow>, DatabaseError>;

    async fn equipment(&mut self, query: &EquipmentQuery)
        -> Result<Vec<EquipmentRow>, DatabaseError>;

    /// Insert one enquiry in its own transaction and return the new id
    async fn insert_enquiry(&mut self, enquiry: &NewBuyerEnquiry) -> Result<u64, DatabaseError>;

    /// Object key of at most one approved booking for the given slot
    async fn approved_slot_key(
        &mut self,
        booking_date: NaiveDate,
        hour: &str,
    ) -> Result<Option<String>, DatabaseError>;
}

/// Session over a pooled MySQL connection.
///
/// The connection is checked out on the first query and goes back to the
/// pool when the session is dropped, whatever the outcome of the request.
pub struct MySqlSession {
    pool: MySqlPool,
    conn: Option<PoolConnection<MySql>>,
}

impl MySqlSession {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool, conn: None }
    }

    async fn connection(&mut self) -> Result<&mut PoolConnection<MySql>, DatabaseError> {
        if self.conn.is_none() {
            let conn = self.pool.acquire().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to acquire database connection");
                DatabaseError::from(e)
            })?;
            self.conn = Some(conn);
        }
        self.conn
            .as_mut()
            .ok_or_else(|| DatabaseError::ConnectionFailed("connection not acquired".to_string()))
    }
}

#[async_trait]
impl Session for MySqlSession {
    #[instrument(skip(self))]
    async fn division_segments(&mut self) -> Result<Vec<DivisionSegmentRow>, DatabaseError> {
        let conn = self.connection().await?;
        let rows = sqlx::query_as::<_, DivisionSegmentRow>(
            r#"
            SELECT DISTINCT f.division_id, f.division_name,
                   f.market_segment_id, f.market_segment_name, m.image_url
            FROM equipment_capabilities_fct f
            JOIN market_segments m ON f.market_segment_id = m.id
            "#,
        )
        .fetch_all(&mut **conn)
        .await?;

        tracing::debug!(count = rows.len(), "Found division segments");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn unit_operations(
        &mut self,
        query: &UnitOperationQuery,
    ) -> Result<Vec<UnitOperationRow>, DatabaseError> {
        let conn = self.connection().await?;
        let rows = sqlx::query_as::<_, UnitOperationRow>(
            r#"
            SELECT DISTINCT division_id, division_name, unit_operation_id, unit_operation
            FROM equipment_capabilities_fct
            WHERE division_id = ? AND market_segment_id = ?
            "#,
        )
        .bind(query.division_id)
        .bind(query.market_segment_id)
        .fetch_all(&mut **conn)
        .await?;

        tracing::debug!(count = rows.len(), "Found unit operations");
        Ok(rows)
    }

    #[instrument(skip(self))]
    async fn equipment(
        &mut self,
        query: &EquipmentQuery,
    ) -> Result<Vec<EquipmentRow>, DatabaseError> {
        let conn = self.connection().await?;
        let rows = sqlx::query_as::<_, EquipmentRow>(
            r#"
            SELECT DISTINCT f.division_id, e.machine_name, e.id, e.machine_image_url
            FROM equipment_capabilities_fct f
            JOIN equipments e ON e.id = f.id
            WHERE f.division_id = ? AND f.market_segment_id = ? AND f.unit_operation_id = ?
            "#,
        )
        .bind(query.division_id)
        .bind(query.market_segment_id)
        .bind(query.unit_operation_id)
        .fetch_all(&mut **conn)
        .await?;

        tracing::debug!(count = rows.len(), "Found equipment");
        Ok(rows)
    }

    #[instrument(skip(self, enquiry), fields(buyer_id = enquiry.buyer_id, equipment_id = enquiry.equipment_id))]
    async fn insert_enquiry(&mut self, enquiry: &NewBuyerEnquiry) -> Result<u64, DatabaseError> {
        let conn = self.connection().await?;

        // Dropping the transaction without commit rolls it back
        let mut tx = conn
            .begin()
            .await
            .map_err(DatabaseError::transaction)?;

        let result = sqlx::query(
            r#"
            INSERT INTO buyer_enquired_equipments (
                buyer_id, market_segment_id, unit_operation_id, equipment_id,
                capacity_id, e_registered_details, archive
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(enquiry.buyer_id)
        .bind(enquiry.market_segment_id)
        .bind(enquiry.unit_operation_id)
        .bind(enquiry.equipment_id)
        .bind(enquiry.capacity_id)
        .bind(enquiry.e_registered_details.as_ref().map(sqlx::types::Json))
        .bind(enquiry.archive.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit()
            .await
            .map_err(DatabaseError::transaction)?;

        let id = result.last_insert_id();
        tracing::info!(enquiry_id = id, "Buyer enquiry inserted");
        Ok(id)
    }

    #[instrument(skip(self))]
    async fn approved_slot_key(
        &mut self,
        booking_date: NaiveDate,
        hour: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let conn = self.connection().await?;
        let key = sqlx::query_scalar::<_, Option<String>>(
            r#"
            SELECT s.url
            FROM slot_booking_requests s
            JOIN calendar_time_rates c ON s.booking_date_id = c.id
            WHERE c.booking_date = ? AND c.hour = ? AND s.approval_status = ?
            LIMIT 1
            "#,
        )
        .bind(booking_date)
        .bind(hour)
        .bind(APPROVED)
        .fetch_optional(&mut **conn)
        .await?;

        Ok(key.flatten())
    }
}
