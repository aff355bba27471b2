//! API models for product stock.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::models::reservations::ReservationResponse;
use crate::db::models::stocks::ProductStock;
use crate::types::StockId;

/// Request payload for creating or updating a stock entry. The entry is
/// keyed on `product_id`: posting an existing product replaces its name and
/// total quantity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockUpsert {
    /// Catalog key of the product
    pub product_id: String,
    /// Display name shown in availability listings
    pub product_name: String,
    /// Units owned in total
    pub total_stock: i32,
}

/// A stock entry as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockResponse {
    #[schema(value_type = Uuid)]
    pub id: StockId,
    pub product_id: String,
    pub product_name: String,
    pub total_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductStock> for StockResponse {
    fn from(stock: ProductStock) -> Self {
        Self {
            id: stock.id,
            product_id: stock.product_id,
            product_name: stock.product_name,
            total_stock: stock.total_stock,
            created_at: stock.created_at,
            updated_at: stock.updated_at,
        }
    }
}

/// A stock entry with its active reservations, soonest first. Admin listing
/// shape.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockWithReservations {
    #[serde(flatten)]
    pub stock: StockResponse,
    pub reservations: Vec<ReservationResponse>,
}
