//! Handlers for the public availability endpoints.

use std::collections::BTreeMap;

use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::NaiveDate;

use crate::{
    availability::{self, day_end, day_start, month_days, DayUtilization, ProductAvailability},
    api::models::availability::{AvailabilityQuery, CalendarQuery},
    db::handlers::{Reservations, Stocks},
    errors::{Error, Result},
    AppState,
};

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| Error::validation("date", "expected YYYY-MM-DD"))
}

/// Parse a `YYYY-MM` month into the first day of that month.
fn parse_month(s: &str) -> Result<NaiveDate> {
    let invalid = || Error::validation("month", "expected YYYY-MM");
    let (year, month) = s.split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)
}

/// Per-product availability for a single day
#[utoipa::path(
    get,
    path = "/api/v1/availability",
    tag = "availability",
    summary = "Per-product availability for a date",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Availability of every tracked product on the requested day", body = [ProductAvailability]),
        (status = 400, description = "Missing or malformed date"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<ProductAvailability>>> {
    let date = query.date.as_deref().ok_or_else(|| Error::validation("date", "date is required"))?;
    let day = parse_date(date)?;

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let stocks = Stocks::new(&mut conn).list().await?;
    let reservations = Reservations::new(&mut conn)
        .list_reserved_overlapping(day_start(day), day_end(day))
        .await?;

    Ok(Json(availability::availability_for_date(day, &stocks, &reservations)))
}

/// Month-level utilization bands for calendar coloring
#[utoipa::path(
    get,
    path = "/api/v1/availability/calendar",
    tag = "availability",
    summary = "Utilization calendar for a month",
    params(CalendarQuery),
    responses(
        (status = 200, description = "One entry per calendar day, keyed YYYY-MM-DD", body = BTreeMap<String, DayUtilization>),
        (status = 400, description = "Missing or malformed month"),
        (status = 500, description = "Internal server error"),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<BTreeMap<String, DayUtilization>>> {
    let month = query.month.as_deref().ok_or_else(|| Error::validation("month", "month is required"))?;
    let first = parse_month(month)?;
    let last = month_days(first).last().unwrap_or(first);

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let total_stock_all = Stocks::new(&mut conn).total_stock_all().await?;
    let reservations = Reservations::new(&mut conn)
        .list_reserved_overlapping(day_start(first), day_end(last))
        .await?;

    Ok(Json(availability::monthly_utilization(first, &reservations, total_stock_all)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, create_test_reservation, create_test_stock};
    use sqlx::PgPool;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-07-03").unwrap(), NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
        assert!(parse_date("2025-7-3x").is_err());
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-07").unwrap(), NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert!(parse_month("2025").is_err());
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("abcd-ef").is_err());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_availability_endpoint_reflects_reservations(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let stock = create_test_stock(&pool, "velvet-sofa", "Velvet sofa", 10).await;
        create_test_reservation(&pool, stock.id, 10, "2025-07-01", "2025-07-05").await;

        let inside = server.get("/api/v1/availability").add_query_param("date", "2025-07-03").await;
        inside.assert_status_ok();
        let body: Vec<ProductAvailability> = inside.json();
        assert_eq!(body.len(), 1);
        assert_eq!(body[0].available, 0);
        assert_eq!(body[0].status, crate::availability::AvailabilityStatus::SoldOut);

        let outside = server.get("/api/v1/availability").add_query_param("date", "2025-07-06").await;
        let body: Vec<ProductAvailability> = outside.json();
        assert_eq!(body[0].available, 10);
        assert_eq!(body[0].status, crate::availability::AvailabilityStatus::Available);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_availability_endpoint_requires_valid_date(pool: PgPool) {
        let server = create_test_app(pool).await;

        let missing = server.get("/api/v1/availability").await;
        missing.assert_status_bad_request();

        let malformed = server.get("/api/v1/availability").add_query_param("date", "03/07/2025").await;
        malformed.assert_status_bad_request();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_calendar_endpoint_covers_whole_month(pool: PgPool) {
        let server = create_test_app(pool.clone()).await;

        let a = create_test_stock(&pool, "table", "Banquet table", 20).await;
        create_test_stock(&pool, "chair", "Banquet chair", 10).await;
        create_test_reservation(&pool, a.id, 15, "2025-07-01", "2025-07-01").await;

        let response = server.get("/api/v1/availability/calendar").add_query_param("month", "2025-07").await;
        response.assert_status_ok();
        let body: BTreeMap<String, DayUtilization> = response.json();

        assert_eq!(body.len(), 31);
        assert_eq!(body["2025-07-01"].reserved_items, 15);
        // 15 of 30 units: exactly half the fleet is out -> moderate
        assert_eq!(body["2025-07-01"].status, crate::availability::UtilizationStatus::Moderate);
        assert_eq!(body["2025-07-02"].reserved_items, 0);

        let missing = server.get("/api/v1/availability/calendar").await;
        missing.assert_status_bad_request();
    }
}
