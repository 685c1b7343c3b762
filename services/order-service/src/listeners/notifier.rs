use std::sync::Arc;

use matching_engine::{ListenerError, TradeListener};
use tracing::{debug, info};
use types::ids::OrderId;
use types::order::Order;
use types::trade::Trade;

use crate::repository::OrderRepository;

/// Tells the owner of each participating order about a fill
///
/// Messages are built from the stored order, so when this runs behind a
/// queue the fill state may already include later trades.
pub struct UserNotifier {
    orders: Arc<dyn OrderRepository>,
}

impl UserNotifier {
    pub fn new(orders: Arc<dyn OrderRepository>) -> Self {
        Self { orders }
    }

    fn notify_owner(&self, order_id: OrderId, trade: &Trade) {
        match self.orders.find_by_id(order_id) {
            Some(order) => info!(user_id = %order.user_id, "{}", fill_message(&order, trade)),
            None => debug!(order_id = %order_id, "No stored order to notify about"),
        }
    }
}

impl TradeListener for UserNotifier {
    fn on_trade(&self, trade: &Trade) -> Result<(), ListenerError> {
        self.notify_owner(trade.aggressing_order_id, trade);
        self.notify_owner(trade.resting_order_id, trade);
        Ok(())
    }

    fn name(&self) -> &str {
        "user-notifier"
    }
}

/// Text sent to the order's owner
pub fn fill_message(order: &Order, trade: &Trade) -> String {
    let id = order
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    let head = format!(
        "MSG to user#{}: Order#{} {} {} {}@{}",
        order.user_id, id, order.side, order.symbol, order.quantity, order.price
    );

    if order.is_filled() {
        format!("{} is fully filled", head)
    } else {
        format!(
            "{} is partially filled: {}@{}",
            head, trade.quantity, trade.price
        )
    }
}
