//! Types library for the warehouse calendar ingestion service
//!
//! Defines the unit of ingestion and the canonical forms used for change
//! detection, so the cache and the store always agree on what a key and a
//! coefficient look like.
//!
//! # Modules
//! - `coefficient`: finite coefficient with canonical string form
//! - `date`: day-granularity calendar date built from wire timestamps
//! - `key`: composite `(warehouse, acceptance type, date)` key
//! - `entry`: validated `CalendarEntry`
//! - `errors`: validation error taxonomy

pub mod coefficient;
pub mod date;
pub mod entry;
pub mod errors;
pub mod key;
