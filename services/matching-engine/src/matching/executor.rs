//! Trade execution logic
//!
//! Builds the trade record for a single fill. Execution price is always the
//! resting (maker) order's price.

use std::sync::Arc;
use types::ids::OrderId;
use types::numeric::{Price, Quantity};
use types::trade::Trade;

use crate::clock::Clock;

/// Match executor for handling trade generation
pub struct MatchExecutor {
    clock: Arc<dyn Clock>,
}

impl MatchExecutor {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Execute a trade between the incoming order and a resting order
    ///
    /// The trade is timestamped at match time and carries no id yet.
    pub fn execute_trade(
        &self,
        aggressing_order_id: OrderId,
        resting_order_id: OrderId,
        resting_price: Price,
        quantity: Quantity,
    ) -> Trade {
        debug_assert!(quantity.is_positive(), "Trade quantity must be positive");

        Trade::new(
            aggressing_order_id,
            resting_order_id,
            resting_price,
            quantity,
            self.clock.now(),
        )
    }
}
