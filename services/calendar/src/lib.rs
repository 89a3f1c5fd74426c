//! Warehouse acceptance calendar ingestion service
//!
//! Accepts authenticated coefficient submissions over gRPC and appends a
//! row to the analytical store only when the coefficient for a
//! `(warehouse, acceptance type, day)` slot actually changed.

pub mod auth;
pub mod config;
pub mod error;
pub mod grpc;
pub mod key_lock;
pub mod service;
pub mod state;

pub mod proto {
    tonic::include_proto!("calendar");
}
