//! Room-booking availability core.
//!
//! Classifies cabinets as fully busy, partially busy, or free for a date and
//! time window, computes per-cabinet schedules with gap-to-next-booking, and
//! keeps the backing directory of users, cabinets, and time-slot pairs.

pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
