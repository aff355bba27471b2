//! Test utilities: app construction and database fixtures.

use axum_test::TestServer;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::availability::day_start;
use crate::config::Config;
use crate::db::handlers::{Reservations, Stocks};
use crate::db::models::reservations::{ReservationCreateDBRequest, StockReservation};
use crate::db::models::stocks::{ProductStock, StockUpsertDBRequest};
use crate::types::StockId;

pub fn create_test_config() -> Config {
    Config::default()
}

/// Build a test server over the harness-provided pool.
pub async fn create_test_app(pool: PgPool) -> TestServer {
    let app = crate::Application::new_with_pool(create_test_config(), Some(pool))
        .await
        .expect("Failed to create application");
    app.into_test_server()
}

pub async fn create_test_stock(pool: &PgPool, product_id: &str, product_name: &str, total_stock: i32) -> ProductStock {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Stocks::new(&mut conn)
        .upsert(&StockUpsertDBRequest {
            product_id: product_id.to_string(),
            product_name: product_name.to_string(),
            total_stock,
        })
        .await
        .expect("Failed to create test stock")
}

/// Insert a reserved row directly, bypassing the capacity check. Dates are
/// `YYYY-MM-DD`, inclusive of the end day.
pub async fn create_test_reservation(pool: &PgPool, stock_id: StockId, quantity: i32, start: &str, end: &str) -> StockReservation {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").expect("bad start date in fixture");
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d").expect("bad end date in fixture");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Reservations::new(&mut conn)
        .create(&ReservationCreateDBRequest {
            stock_id,
            quantity,
            start_date: day_start(start),
            end_date: day_start(end),
            quote_id: None,
        })
        .await
        .expect("Failed to create test reservation")
}
