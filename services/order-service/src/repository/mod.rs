//! Storage contracts for orders and trades
//!
//! The service only depends on these traits. The in-memory implementations
//! back the binary and the tests.

mod orders;
mod trades;

pub use orders::InMemoryOrderRepository;
pub use trades::InMemoryTradeRepository;

use types::ids::OrderId;
use types::order::Order;
use types::trade::Trade;

/// Order storage
pub trait OrderRepository: Send + Sync {
    /// Store an order
    ///
    /// An order without an id gets the next one (starting at 1, strictly
    /// increasing, never reused). An order that already has an id replaces
    /// the stored copy and comes back unchanged.
    fn save(&self, order: Order) -> Order;

    fn find_by_id(&self, id: OrderId) -> Option<Order>;
}

/// Trade storage
pub trait TradeRepository: Send + Sync {
    /// Record a trade, assigning an id when it has none, and index it under
    /// both order ids
    fn save(&self, trade: Trade) -> Trade;

    /// Every trade the order took part in, on either side, oldest first
    fn find_by_order_id(&self, order_id: OrderId) -> Vec<Trade>;
}
