//! Availability computation over stock and reservations.
//!
//! Everything in this module is pure: callers fetch rows through the
//! repositories and hand them in. The day-boundary overlap test lives here in
//! one place and is shared by the per-date endpoint, the calendar endpoint,
//! and the capacity check performed before inserting a reservation.
//!
//! All day arithmetic is UTC. A reservation's `end_date` is inclusive of the
//! final day: the interval is `[start_date, end_of_day(end_date)]`.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::db::models::reservations::{ReservationStatus, StockReservation};
use crate::db::models::stocks::ProductStock;

/// Fraction of total stock at or below which a product is flagged `low_stock`.
pub const LOW_STOCK_RATIO: f64 = 0.2;

/// Calendar utilization at or above this rate is `moderate`.
pub const MODERATE_UTILIZATION: f64 = 0.5;

/// Calendar utilization above this rate is `busy` (strictly greater).
pub const BUSY_UTILIZATION: f64 = 0.8;

/// Per-product availability status for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    LowStock,
    SoldOut,
}

/// Whole-calendar utilization band for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationStatus {
    Free,
    Light,
    Moderate,
    Busy,
}

/// Availability of one product on one day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductAvailability {
    /// Catalog key of the product
    pub product_id: String,
    /// Denormalized display name
    pub product_name: String,
    /// Units owned in total
    pub total_stock: i32,
    /// Units held by reservations overlapping the day
    pub reserved: i64,
    /// Units still free, clamped at zero
    pub available: i64,
    pub status: AvailabilityStatus,
    /// True when reserved quantity exceeds owned stock. The `available` clamp
    /// keeps the display contract; this flag keeps the anomaly visible.
    pub overbooked: bool,
}

/// Aggregate utilization of one calendar day across all products.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DayUtilization {
    /// Units held by reservations overlapping the day, all products combined
    pub reserved_items: i64,
    pub status: UtilizationStatus,
}

/// First instant of `day` in UTC.
pub fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// Last instant of `day` in UTC (close of business, microsecond resolution).
pub fn day_end(day: NaiveDate) -> DateTime<Utc> {
    day_start(day) + Duration::days(1) - Duration::microseconds(1)
}

/// Does the inclusive interval `[start, end]` intersect calendar day `day`?
pub fn overlaps_day(start: DateTime<Utc>, end: DateTime<Utc>, day: NaiveDate) -> bool {
    start <= day_end(day) && end >= day_start(day)
}

/// The calendar days of the month that `first` is the first day of.
pub fn month_days(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let month = first.month();
    first.iter_days().take_while(move |d| d.month() == month)
}

fn is_active(r: &StockReservation) -> bool {
    r.status == ReservationStatus::Reserved
}

/// Sum of reserved quantity over rows overlapping `day`. Cancelled rows never
/// count.
fn reserved_on_day<'a, I>(reservations: I, day: NaiveDate) -> i64
where
    I: IntoIterator<Item = &'a StockReservation>,
{
    reservations
        .into_iter()
        .filter(|r| is_active(r) && overlaps_day(r.start_date, r.end_date, day))
        .map(|r| i64::from(r.quantity))
        .sum()
}

fn classify_availability(total_stock: i32, available: i64) -> AvailabilityStatus {
    if available <= 0 {
        AvailabilityStatus::SoldOut
    } else if available as f64 <= f64::from(total_stock) * LOW_STOCK_RATIO {
        AvailabilityStatus::LowStock
    } else {
        AvailabilityStatus::Available
    }
}

fn classify_utilization(rate: f64) -> UtilizationStatus {
    if rate > BUSY_UTILIZATION {
        UtilizationStatus::Busy
    } else if rate >= MODERATE_UTILIZATION {
        UtilizationStatus::Moderate
    } else if rate > 0.0 {
        UtilizationStatus::Light
    } else {
        UtilizationStatus::Free
    }
}

/// Per-product availability on `day`.
///
/// Output order follows `stocks`. Reservations belonging to stocks not in the
/// list are ignored. Overbooking is absorbed by the zero clamp and reported
/// through the `overbooked` flag.
pub fn availability_for_date(
    day: NaiveDate,
    stocks: &[ProductStock],
    reservations: &[StockReservation],
) -> Vec<ProductAvailability> {
    stocks
        .iter()
        .map(|stock| {
            let reserved = reserved_on_day(reservations.iter().filter(|r| r.stock_id == stock.id), day);
            let available = (i64::from(stock.total_stock) - reserved).max(0);
            ProductAvailability {
                product_id: stock.product_id.clone(),
                product_name: stock.product_name.clone(),
                total_stock: stock.total_stock,
                reserved,
                available,
                status: classify_availability(stock.total_stock, i64::from(stock.total_stock) - reserved),
                overbooked: reserved > i64::from(stock.total_stock),
            }
        })
        .collect()
}

/// Day-by-day utilization for the month beginning at `first_of_month`.
///
/// One entry per calendar day, keyed `YYYY-MM-DD`. The rate is the
/// cross-product reserved quantity divided by `total_stock_all` (zero when no
/// stock is owned at all).
pub fn monthly_utilization(
    first_of_month: NaiveDate,
    reservations: &[StockReservation],
    total_stock_all: i64,
) -> BTreeMap<String, DayUtilization> {
    month_days(first_of_month)
        .map(|day| {
            let reserved_items = reserved_on_day(reservations, day);
            let rate = if total_stock_all > 0 {
                reserved_items as f64 / total_stock_all as f64
            } else {
                0.0
            };
            (
                day.format("%Y-%m-%d").to_string(),
                DayUtilization {
                    reserved_items,
                    status: classify_utilization(rate),
                },
            )
        })
        .collect()
}

/// Maximum concurrently reserved quantity over each day of `[start, end]`.
///
/// This is the capacity-check half of reservation creation: a new reservation
/// of quantity `q` fits iff `peak_reserved(existing, start, end) + q` stays
/// within the product's total stock.
pub fn peak_reserved(reservations: &[StockReservation], start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let mut peak = 0i64;
    let last = end.date_naive();
    for day in start.date_naive().iter_days().take_while(|d| *d <= last) {
        peak = peak.max(reserved_on_day(reservations, day));
    }
    peak
}
