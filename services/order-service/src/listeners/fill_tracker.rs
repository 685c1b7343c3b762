use std::sync::Arc;

use matching_engine::{ListenerError, TradeListener};
use types::ids::OrderId;
use types::order::Order;
use types::trade::Trade;

use crate::repository::OrderRepository;

/// Applies each fill to the stored copy of both participating orders
///
/// Runs synchronously under the book lock, so by the time `place_order`
/// returns the repository reflects every fill the submission caused.
pub struct FillTracker {
    orders: Arc<dyn OrderRepository>,
}

impl FillTracker {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    /// Stored copy of `order_id` with the trade's fill applied, not yet saved
    fn filled(&self, order_id: OrderId, trade: &Trade) -> Result<Order, ListenerError> {
        let mut order = self
            .orders
            .find_by_id(order_id)
            .ok_or_else(|| ListenerError::Failed(format!("order {} not stored", order_id)))?;

        if trade.quantity > order.remaining_quantity() {
            return Err(ListenerError::Failed(format!(
                "fill of {} exceeds remaining {} on order {}",
                trade.quantity,
                order.remaining_quantity(),
                order_id
            )));
        }

        order.fill(trade.quantity);
        Ok(order)
    }
}

impl TradeListener for FillTracker {
    fn on_trade(&self, trade: &Trade) -> Result<(), ListenerError> {
        // Both sides are checked before either is written
        let resting = self.filled(trade.resting_order_id, trade)?;
        let aggressing = self.filled(trade.aggressing_order_id, trade)?;

        self.orders.save(resting);
        self.orders.save(aggressing);
        Ok(())
    }

    fn name(&self) -> &str {
        "fill-tracker"
    }
}
