//! Order service
//!
//! Places orders into per-instrument matching engines and wires the trade
//! consumers that persist fills and notify order owners.
//!
//! # Modules
//! - `registry`: lazily created engine per instrument, each behind a mutex
//! - `service`: placement coordinator and read queries
//! - `repository`: order and trade storage contracts plus in-memory stores
//! - `listeners`: trade consumers
//! - `models`: placement request validation
//! - `config`: service configuration
//! - `runtime`: wiring for the binary

pub mod config;
pub mod error;
pub mod listeners;
pub mod models;
pub mod registry;
pub mod repository;
pub mod runtime;
pub mod service;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use models::PlaceOrderRequest;
pub use registry::{BookHandle, BookRegistry};
pub use runtime::ServiceRuntime;
pub use service::OrderService;
