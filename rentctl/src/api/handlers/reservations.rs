//! Handlers for reservation creation and cancellation.
//!
//! Creation is the one write path that must uphold the capacity invariant:
//! the sum of reserved quantity overlapping any instant must never exceed the
//! product's total stock. The check and the insert run in one transaction,
//! serialized per stock by an advisory lock, so two concurrent requests
//! cannot both pass the check and overbook.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    api::models::reservations::{CancelResponse, ReservationCreate, ReservationResponse},
    availability::peak_reserved,
    db::handlers::{Reservations, Stocks},
    db::models::reservations::ReservationCreateDBRequest,
    errors::{Error, Result},
    types::ReservationId,
    AppState,
};

/// Create a reservation
#[utoipa::path(
    post,
    path = "/admin/api/v1/stock/reservations",
    tag = "reservations",
    summary = "Reserve stock for a date range",
    request_body = ReservationCreate,
    responses(
        (status = 201, description = "Reservation created", body = ReservationResponse),
        (status = 400, description = "Invalid quantity or date range"),
        (status = 404, description = "Stock entry not found"),
        (status = 409, description = "Reservation would exceed total stock on at least one day"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(stock_id = %data.stock_id))]
pub async fn create_reservation(
    State(state): State<AppState>,
    Json(data): Json<ReservationCreate>,
) -> Result<(StatusCode, Json<ReservationResponse>)> {
    if data.quantity < 1 {
        return Err(Error::validation("quantity", "must be at least 1"));
    }
    if data.start_date > data.end_date {
        return Err(Error::validation("end_date", "must not be before start_date"));
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    // Serialize against concurrent reserves on the same stock before looking
    // at anything; the lock holds until commit or rollback.
    Reservations::new(&mut tx).lock_stock(data.stock_id).await?;

    let stock = Stocks::new(&mut tx)
        .get_by_id(data.stock_id)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Stock".to_string(),
            id: data.stock_id.to_string(),
        })?;

    let mut repo = Reservations::new(&mut tx);
    let existing = repo
        .list_reserved_for_stock_overlapping(stock.id, data.start_date, data.end_date)
        .await?;

    let peak = peak_reserved(&existing, data.start_date, data.end_date);
    let requested = i64::from(data.quantity);
    if peak + requested > i64::from(stock.total_stock) {
        return Err(Error::CapacityExceeded {
            stock_id: stock.id,
            requested: data.quantity,
            available: (i64::from(stock.total_stock) - peak).max(0),
        });
    }

    let created = repo
        .create(&ReservationCreateDBRequest {
            stock_id: stock.id,
            quantity: data.quantity,
            start_date: data.start_date,
            end_date: data.end_date,
            quote_id: data.quote_id,
        })
        .await?;

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(ReservationResponse::from(created))))
}

/// Cancel a reservation
#[utoipa::path(
    delete,
    path = "/admin/api/v1/stock/reservations/{id}",
    tag = "reservations",
    summary = "Cancel a reservation",
    params(
        ("id" = Uuid, Path, description = "Reservation to cancel"),
    ),
    responses(
        (status = 200, description = "Reservation cancelled (or already was)", body = CancelResponse),
        (status = 404, description = "No such reservation"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all, fields(reservation_id = %id))]
pub async fn cancel_reservation(
    State(state): State<AppState>,
    Path(id): Path<ReservationId>,
) -> Result<Json<CancelResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let found = Reservations::new(&mut conn).cancel(id).await?;
    if !found {
        return Err(Error::NotFound {
            resource: "Reservation".to_string(),
            id: id.to_string(),
        });
    }

    Ok(Json(CancelResponse { success: true }))
}
