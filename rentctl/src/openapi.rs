//! OpenAPI documentation for the availability and stock management API.

use utoipa::OpenApi;

use crate::api::models::{
    reservations::{CancelResponse, ReservationCreate, ReservationResponse},
    stocks::{StockResponse, StockUpsert, StockWithReservations},
};
use crate::availability::{AvailabilityStatus, DayUtilization, ProductAvailability, UtilizationStatus};
use crate::db::models::reservations::ReservationStatus;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "rentctl",
        description = "Availability queries and stock reservations for event-equipment rental"
    ),
    paths(
        crate::api::handlers::availability::get_availability,
        crate::api::handlers::availability::get_calendar,
        crate::api::handlers::stocks::list_stock,
        crate::api::handlers::stocks::upsert_stock,
        crate::api::handlers::reservations::create_reservation,
        crate::api::handlers::reservations::cancel_reservation,
    ),
    components(schemas(
        ProductAvailability,
        DayUtilization,
        AvailabilityStatus,
        UtilizationStatus,
        StockUpsert,
        StockResponse,
        StockWithReservations,
        ReservationCreate,
        ReservationResponse,
        ReservationStatus,
        CancelResponse,
    )),
    tags(
        (name = "availability", description = "Public availability and calendar queries"),
        (name = "stock", description = "Admin inventory management"),
        (name = "reservations", description = "Admin reservation ledger"),
    )
)]
pub struct ApiDoc;
