//! API request and response models.

pub mod availability;
pub mod reservations;
pub mod stocks;
