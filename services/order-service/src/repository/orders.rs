use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;
use types::ids::OrderId;
use types::order::Order;

use super::OrderRepository;

/// Orders held in a concurrent map, ids from an atomic counter
#[derive(Debug)]
pub struct InMemoryOrderRepository {
    orders: DashMap<OrderId, Order>,
    next_id: AtomicU64,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for InMemoryOrderRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, order: Order) -> Order {
        let order = match order.id {
            Some(id) => {
                // Keep fresh ids clear of any id stored from outside
                self.next_id.fetch_max(id.value() + 1, Ordering::Relaxed);
                order
            }
            None => {
                let id = OrderId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
                debug!(order_id = %id, symbol = %order.symbol, "Assigned order id");
                order.with_id(id)
            }
        };

        if let Some(id) = order.id {
            self.orders.insert(id, order.clone());
        }
        order
    }

    fn find_by_id(&self, id: OrderId) -> Option<Order> {
        self.orders.get(&id).map(|entry| entry.value().clone())
    }
}
