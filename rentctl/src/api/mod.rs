//! HTTP layer: request/response models and axum handlers.
//!
//! Handlers validate input, fetch rows through the repositories, and defer
//! all availability math to [`crate::availability`].

pub mod handlers;
pub mod models;
