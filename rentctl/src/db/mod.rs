//! Database layer for stock and reservation persistence.
//!
//! Built on SQLx with PostgreSQL, following the repository pattern:
//!
//! ```text
//! API handlers -> db::handlers (repositories) -> db::models -> PostgreSQL
//! ```
//!
//! Repositories wrap a `&mut PgConnection`, so they work equally over a pool
//! connection (read paths) or a transaction (the reserve path, which needs
//! the capacity check and the insert to commit atomically).
//!
//! Migrations live in `migrations/` and are embedded via [`crate::migrator`].

pub mod errors;
pub mod handlers;
pub mod models;
