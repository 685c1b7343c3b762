//! Types library for the limit order book service
//!
//! Value types shared by the matching engine and the order service.
//!
//! # Modules
//! - `ids`: Identifiers (OrderId, TradeId, UserId, Symbol)
//! - `numeric`: Fixed-point decimal types (Price, Quantity)
//! - `order`: Limit orders and sides
//! - `trade`: Executed trades
//! - `errors`: Validation errors

pub mod ids;
pub mod numeric;
pub mod order;
pub mod trade;
pub mod errors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::numeric::*;
    pub use crate::order::*;
    pub use crate::trade::*;
    pub use crate::errors::*;
}
