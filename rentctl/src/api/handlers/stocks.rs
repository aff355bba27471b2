//! Handlers for the admin stock endpoints.

use axum::{extract::State, response::Json};

use crate::{
    api::models::{
        reservations::ReservationResponse,
        stocks::{StockResponse, StockUpsert, StockWithReservations},
    },
    db::handlers::{Reservations, Stocks},
    errors::{Error, Result},
    AppState,
};

/// List stock entries with their active reservations
#[utoipa::path(
    get,
    path = "/admin/api/v1/stock",
    tag = "stock",
    summary = "List stock with active reservations",
    responses(
        (status = 200, description = "Every stock entry, ordered by product name, each with its reserved holds soonest first", body = [StockWithReservations]),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_stock(State(state): State<AppState>) -> Result<Json<Vec<StockWithReservations>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let stocks = Stocks::new(&mut conn).list().await?;

    let mut out = Vec::with_capacity(stocks.len());
    let mut reservations = Reservations::new(&mut conn);
    for stock in stocks {
        let active = reservations
            .list_reserved_for_stock(stock.id)
            .await?
            .into_iter()
            .map(ReservationResponse::from)
            .collect();
        out.push(StockWithReservations {
            stock: StockResponse::from(stock),
            reservations: active,
        });
    }

    Ok(Json(out))
}

/// Create or update a stock entry
#[utoipa::path(
    post,
    path = "/admin/api/v1/stock",
    tag = "stock",
    summary = "Upsert a stock entry",
    request_body = StockUpsert,
    responses(
        (status = 200, description = "Stock entry created or updated", body = StockResponse),
        (status = 400, description = "Invalid payload"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn upsert_stock(State(state): State<AppState>, Json(data): Json<StockUpsert>) -> Result<Json<StockResponse>> {
    if data.product_id.trim().is_empty() {
        return Err(Error::validation("product_id", "must not be empty"));
    }
    if data.product_name.trim().is_empty() {
        return Err(Error::validation("product_name", "must not be empty"));
    }
    if data.total_stock < 0 {
        return Err(Error::validation("total_stock", "must be zero or positive"));
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let stock = Stocks::new(&mut conn).upsert(&data.into()).await?;

    Ok(Json(StockResponse::from(stock)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, create_test_reservation, create_test_stock};
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_upsert_and_list_roundtrip(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let created = server
            .post("/admin/api/v1/stock")
            .json(&json!({"product_id": "gold-cutlery", "product_name": "Gold cutlery set", "total_stock": 60}))
            .await;
        created.assert_status_ok();
        let created: StockResponse = created.json();
        assert_eq!(created.total_stock, 60);

        // Second upsert with the same product_id updates in place
        let updated = server
            .post("/admin/api/v1/stock")
            .json(&json!({"product_id": "gold-cutlery", "product_name": "Gold cutlery set", "total_stock": 48}))
            .await;
        let updated: StockResponse = updated.json();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.total_stock, 48);

        create_test_reservation(&pool, created.id, 6, "2025-10-01", "2025-10-02").await;

        let listing = server.get("/admin/api/v1/stock").await;
        listing.assert_status_ok();
        let listing: Vec<StockWithReservations> = listing.json();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].reservations.len(), 1);
        assert_eq!(listing[0].reservations[0].quantity, 6);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_upsert_rejects_bad_payloads(pool: PgPool) {
        let server = create_test_app(pool).await;

        let blank_id = server
            .post("/admin/api/v1/stock")
            .json(&json!({"product_id": "  ", "product_name": "Lantern", "total_stock": 4}))
            .await;
        blank_id.assert_status_bad_request();

        let negative = server
            .post("/admin/api/v1/stock")
            .json(&json!({"product_id": "lantern", "product_name": "Lantern", "total_stock": -1}))
            .await;
        negative.assert_status_bad_request();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_listing_omits_cancelled_reservations(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let stock = create_test_stock(&pool, "dance-floor", "Dance floor", 1).await;
        let reservation = create_test_reservation(&pool, stock.id, 1, "2025-09-01", "2025-09-02").await;

        server
            .delete(&format!("/admin/api/v1/stock/reservations/{}", reservation.id))
            .await
            .assert_status_ok();

        let listing: Vec<StockWithReservations> = server.get("/admin/api/v1/stock").await.json();
        assert!(listing[0].reservations.is_empty());
    }
}
