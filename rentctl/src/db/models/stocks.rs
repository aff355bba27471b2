//! Database models for product stock.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::api::models::stocks::StockUpsert;
use crate::types::StockId;

/// One row of the inventory store: the total owned quantity of a product.
#[derive(Debug, Clone, FromRow)]
pub struct ProductStock {
    pub id: StockId,
    /// Key into the external product catalog
    pub product_id: String,
    /// Denormalized display label
    pub product_name: String,
    pub total_stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Database request for creating or updating a stock entry, keyed on
/// `product_id`.
#[derive(Debug, Clone)]
pub struct StockUpsertDBRequest {
    pub product_id: String,
    pub product_name: String,
    pub total_stock: i32,
}

impl From<StockUpsert> for StockUpsertDBRequest {
    fn from(api: StockUpsert) -> Self {
        Self {
            product_id: api.product_id,
            product_name: api.product_name,
            total_stock: api.total_stock,
        }
    }
}
