//! Query models for the availability endpoints.
//!
//! The response bodies ([`crate::availability::ProductAvailability`] and
//! [`crate::availability::DayUtilization`]) are produced directly by the
//! engine; only the query parameters live here.

use serde::Deserialize;
use utoipa::IntoParams;

/// Query parameters for per-date availability.
#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailabilityQuery {
    /// Calendar day to check, `YYYY-MM-DD`
    pub date: Option<String>,
}

/// Query parameters for the monthly utilization calendar.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CalendarQuery {
    /// Month to aggregate, `YYYY-MM`
    pub month: Option<String>,
}
