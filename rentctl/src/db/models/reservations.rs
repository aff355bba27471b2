//! Database models for stock reservations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::types::{QuoteId, ReservationId, StockId};

/// Lifecycle of a reservation. `reserved` is the initial state and the only
/// one that counts against capacity; `cancelled` is terminal, with no path
/// back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "reservation_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Reserved,
    Cancelled,
}

/// A date-ranged hold against a product's stock. `end_date` is inclusive of
/// the final day. Quantity and dates are immutable after creation; a change
/// is modeled as cancel-and-recreate.
#[derive(Debug, Clone, FromRow)]
pub struct StockReservation {
    pub id: ReservationId,
    pub stock_id: StockId,
    pub quantity: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ReservationStatus,
    /// Weak reference to the originating quote; informational only
    pub quote_id: Option<QuoteId>,
    pub created_at: DateTime<Utc>,
}

/// Database request for inserting a reservation. Status is always `reserved`
/// at creation.
#[derive(Debug, Clone)]
pub struct ReservationCreateDBRequest {
    pub stock_id: StockId,
    pub quantity: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub quote_id: Option<QuoteId>,
}
