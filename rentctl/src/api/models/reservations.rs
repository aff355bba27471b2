//! API models for stock reservations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::reservations::{ReservationStatus, StockReservation};
use crate::types::{QuoteId, ReservationId, StockId};

/// Request payload for creating a reservation.
///
/// `end_date` is inclusive of the final rental day. Timestamps are RFC 3339;
/// day-level holds use midnight UTC.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationCreate {
    /// Stock entry to reserve against
    #[schema(value_type = Uuid)]
    pub stock_id: StockId,
    /// Units to hold, at least 1
    pub quantity: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Originating quote, if the reservation came from the quote workflow
    #[schema(value_type = Option<Uuid>)]
    pub quote_id: Option<QuoteId>,
}

/// A reservation as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReservationResponse {
    #[schema(value_type = Uuid)]
    pub id: ReservationId,
    #[schema(value_type = Uuid)]
    pub stock_id: StockId,
    pub quantity: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: ReservationStatus,
    #[schema(value_type = Option<Uuid>)]
    pub quote_id: Option<QuoteId>,
    pub created_at: DateTime<Utc>,
}

impl From<StockReservation> for ReservationResponse {
    fn from(r: StockReservation) -> Self {
        Self {
            id: r.id,
            stock_id: r.stock_id,
            quantity: r.quantity,
            start_date: r.start_date,
            end_date: r.end_date,
            status: r.status,
            quote_id: r.quote_id,
            created_at: r.created_at,
        }
    }
}

/// Body returned by a successful cancellation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CancelResponse {
    pub success: bool,
}
