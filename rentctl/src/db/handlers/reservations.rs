//! Repository for the reservation ledger.
//!
//! The ledger is append-plus-cancel: rows are inserted as `reserved` and only
//! ever transition to `cancelled`. Quantity and dates never change after
//! creation.

use chrono::{DateTime, Utc};
use sqlx::PgConnection;
use tracing::instrument;

use crate::db::errors::Result;
use crate::db::models::reservations::{ReservationCreateDBRequest, StockReservation};
use crate::types::{ReservationId, StockId};

const RESERVATION_COLUMNS: &str = "id, stock_id, quantity, start_date, end_date, status, quote_id, created_at";

pub struct Reservations<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Reservations<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Serialize reservation writes for one stock within the current
    /// transaction. Concurrent `reserve` calls on the same stock queue behind
    /// this lock, so the overlap sum each of them computes stays valid until
    /// its insert commits. The lock releases with the transaction.
    #[instrument(skip(self), err)]
    pub async fn lock_stock(&mut self, stock_id: StockId) -> Result<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(stock_id.to_string())
            .execute(&mut *self.db)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, request), fields(stock_id = %request.stock_id, quantity = request.quantity), err)]
    pub async fn create(&mut self, request: &ReservationCreateDBRequest) -> Result<StockReservation> {
        let reservation = sqlx::query_as::<_, StockReservation>(
            r#"
            INSERT INTO stock_reservations (stock_id, quantity, start_date, end_date, quote_id, status)
            VALUES ($1, $2, $3, $4, $5, 'reserved')
            RETURNING id, stock_id, quantity, start_date, end_date, status, quote_id, created_at
            "#,
        )
        .bind(request.stock_id)
        .bind(request.quantity)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.quote_id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(reservation)
    }

    #[instrument(skip(self), err)]
    pub async fn get_by_id(&mut self, id: ReservationId) -> Result<Option<StockReservation>> {
        let reservation = sqlx::query_as::<_, StockReservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM stock_reservations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(reservation)
    }

    /// Flip a reservation to `cancelled`. Returns `false` when no such row
    /// exists. Cancelling an already-cancelled reservation is a no-op
    /// success.
    #[instrument(skip(self), err)]
    pub async fn cancel(&mut self, id: ReservationId) -> Result<bool> {
        let found = sqlx::query_scalar::<_, ReservationId>(
            "UPDATE stock_reservations SET status = 'cancelled' WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(found.is_some())
    }

    /// Active (`reserved`) rows across all stocks whose interval intersects
    /// `[start, end]`.
    #[instrument(skip(self), err)]
    pub async fn list_reserved_overlapping(&mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<StockReservation>> {
        let rows = sqlx::query_as::<_, StockReservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM stock_reservations
             WHERE status = 'reserved' AND start_date <= $2 AND end_date >= $1"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }

    /// Active rows for one stock whose interval intersects `[start, end]`.
    /// Input to the capacity check on the reserve path.
    #[instrument(skip(self), err)]
    pub async fn list_reserved_for_stock_overlapping(
        &mut self,
        stock_id: StockId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockReservation>> {
        let rows = sqlx::query_as::<_, StockReservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM stock_reservations
             WHERE stock_id = $1 AND status = 'reserved' AND start_date <= $3 AND end_date >= $2"
        ))
        .bind(stock_id)
        .bind(start)
        .bind(end)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }

    /// All active rows for one stock, soonest first. Used by the admin stock
    /// listing.
    #[instrument(skip(self), err)]
    pub async fn list_reserved_for_stock(&mut self, stock_id: StockId) -> Result<Vec<StockReservation>> {
        let rows = sqlx::query_as::<_, StockReservation>(&format!(
            "SELECT {RESERVATION_COLUMNS} FROM stock_reservations
             WHERE stock_id = $1 AND status = 'reserved' ORDER BY start_date ASC"
        ))
        .bind(stock_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows)
    }
}
