//! Price level implementation with FIFO queue
//!
//! A price level contains all resting orders at a specific price point.
//! Orders are kept in arrival order so the oldest is always matched first.

use std::collections::VecDeque;
use types::ids::OrderId;
use types::numeric::Quantity;
use types::order::Order;

/// A price level containing orders at a specific price
///
/// Every queued order has a positive remaining quantity; an order that
/// fills completely leaves the queue in the same call.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Queue of orders at this price level (FIFO order)
    orders: VecDeque<Order>,
    /// Total remaining quantity available at this level
    total_quantity: Quantity,
}

impl PriceLevel {
    pub fn new() -> Self {
        Self {
            orders: VecDeque::new(),
            total_quantity: Quantity::zero(),
        }
    }

    /// Insert an order at the back of the queue (time priority)
    pub fn insert(&mut self, order: Order) {
        debug_assert!(order.id.is_some(), "Resting order must have an id");
        debug_assert!(!order.is_filled(), "Filled order cannot rest");
        self.total_quantity = self.total_quantity + order.remaining_quantity();
        self.orders.push_back(order);
    }

    /// Peek at the oldest order without removing it
    ///
    /// Returns (order_id, remaining_quantity)
    pub fn peek_front(&self) -> Option<(OrderId, Quantity)> {
        self.orders
            .front()
            .and_then(|order| Some((order.id?, order.remaining_quantity())))
    }

    /// Execute `quantity` against the oldest order
    ///
    /// Returns true when that order is now fully filled and has been
    /// removed from the queue.
    pub fn fill_front(&mut self, quantity: Quantity) -> bool {
        let Some(front) = self.orders.front_mut() else {
            return false;
        };

        front.fill(quantity);
        self.total_quantity = self.total_quantity - quantity;

        if front.is_filled() {
            self.orders.pop_front();
            true
        } else {
            false
        }
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Orders oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::new()
    }
}
