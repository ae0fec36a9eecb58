use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::FromRow;

// ============================================================================
// Catalog rows
// ============================================================================

/// Denormalized (division, market segment, unit operation) reporting row
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct CapabilityFact {
    pub id: i32,
    pub unit_operation_id: Option<i32>,
    pub unit_operation: Option<String>,
    pub market_segment_id: Option<i32>,
    pub market_segment_name: Option<String>,
    pub division_id: Option<i32>,
    pub division_name: Option<String>,
}

/// One row per physical equipment type; `machine_image_url` is an object key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct EquipmentDetail {
    pub id: i32,
    pub machine_name: Option<String>,
    pub machine_image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct MarketSegment {
    pub id: i32,
    pub image_url: Option<String>,
}

// ============================================================================
// Listing projections
// ============================================================================

/// Division and market segment pair with the segment's image key
#[derive(Debug, Clone, PartialEq, Eq, Hash, FromRow)]
pub struct DivisionSegmentRow {
    pub division_id: Option<i32>,
    pub division_name: Option<String>,
    pub market_segment_id: Option<i32>,
    pub market_segment_name: Option<String>,
    pub image_url: Option<String>,
}

/// Division and unit operation pair under one market segment
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, FromRow)]
pub struct UnitOperationRow {
    pub division_id: Option<i32>,
    pub division_name: Option<String>,
    pub unit_operation_id: Option<i32>,
    pub unit_operation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, FromRow)]
pub struct EquipmentRow {
    pub division_id: Option<i32>,
    pub machine_name: Option<String>,
    pub id: i32,
    pub machine_image_url: Option<String>,
}

/// [`DivisionSegmentRow`] with its image key swapped for a signed URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionSegmentView {
    pub division_id: Option<i32>,
    pub division_name: Option<String>,
    pub market_segment_id: Option<i32>,
    pub market_segment_name: Option<String>,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// [`EquipmentRow`] with its image key swapped for a signed URL
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquipmentView {
    pub division_id: Option<i32>,
    pub machine_name: Option<String>,
    pub id: i32,
    #[serde(rename = "machineImageUrl")]
    pub machine_image_url: Option<String>,
}

// ============================================================================
// Validated inputs
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitOperationQuery {
    pub division_id: i32,
    pub market_segment_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EquipmentQuery {
    pub division_id: i32,
    pub market_segment_id: i32,
    pub unit_operation_id: i32,
}

/// Archive flag on an enquiry, stored as `ENUM('Y','N')`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Archive {
    #[serde(rename = "Y")]
    Yes,
    #[default]
    #[serde(rename = "N")]
    No,
}

impl Archive {
    pub fn as_str(&self) -> &'static str {
        match self {
            Archive::Yes => "Y",
            Archive::No => "N",
        }
    }
}

/// A validated enquiry ready to be inserted
#[derive(Debug, Clone, PartialEq)]
pub struct NewBuyerEnquiry {
    pub buyer_id: i32,
    pub market_segment_id: i32,
    pub unit_operation_id: i32,
    pub equipment_id: i32,
    pub capacity_id: Option<i32>,
    pub e_registered_details: Option<Map<String, Value>>,
    pub archive: Archive,
}

/// Persisted enquiry row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BuyerEnquiredEquipment {
    pub id: i32,
    pub buyer_id: i32,
    pub market_segment_id: i32,
    pub unit_operation_id: i32,
    pub equipment_id: i32,
    pub capacity_id: Option<i32>,
    pub e_registered_details: Option<sqlx::types::Json<Value>>,
    pub archive: String,
}

// ============================================================================
// Ad slots
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SlotBookingRequest {
    pub id: i32,
    pub url: Option<String>,
    pub booking_date_id: i32,
    pub approval_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct CalendarTimeRates {
    pub id: i32,
    pub booking_date: NaiveDate,
    pub hour: String,
}

pub const APPROVED: &str = "approved";
