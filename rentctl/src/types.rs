//! Common type aliases for entity identifiers.
//!
//! All entity IDs are UUIDs wrapped in type aliases for readability:
//!
//! - [`StockId`]: product stock row identifier
//! - [`ReservationId`]: stock reservation identifier
//! - [`QuoteId`]: weak reference to the quote workflow that originated a
//!   reservation; informational only, never dereferenced here

use uuid::Uuid;

pub type StockId = Uuid;
pub type ReservationId = Uuid;
pub type QuoteId = Uuid;
