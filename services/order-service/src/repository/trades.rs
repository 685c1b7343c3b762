use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use dashmap::DashMap;
use types::ids::{OrderId, TradeId};
use types::trade::Trade;

use super::TradeRepository;

/// Trades indexed by each participating order
#[derive(Debug)]
pub struct InMemoryTradeRepository {
    by_order: DashMap<OrderId, Vec<Trade>>,
    next_id: AtomicU64,
    recorded: AtomicUsize,
}

impl InMemoryTradeRepository {
    pub fn new() -> Self {
        Self {
            by_order: DashMap::new(),
            next_id: AtomicU64::new(1),
            recorded: AtomicUsize::new(0),
        }
    }

    /// Number of trades recorded so far
    pub fn count(&self) -> usize {
        self.recorded.load(Ordering::Relaxed)
    }

    fn index(&self, order_id: OrderId, trade: &Trade) {
        self.by_order
            .entry(order_id)
            .or_default()
            .push(trade.clone());
    }
}

impl Default for InMemoryTradeRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TradeRepository for InMemoryTradeRepository {
    fn save(&self, trade: Trade) -> Trade {
        let trade = match trade.id {
            Some(_) => trade,
            None => trade.with_id(TradeId::new(self.next_id.fetch_add(1, Ordering::Relaxed))),
        };

        self.index(trade.aggressing_order_id, &trade);
        // Self-trades would otherwise be listed twice for the same order
        if trade.resting_order_id != trade.aggressing_order_id {
            self.index(trade.resting_order_id, &trade);
        }
        self.recorded.fetch_add(1, Ordering::Relaxed);
        trade
    }

    fn find_by_order_id(&self, order_id: OrderId) -> Vec<Trade> {
        self.by_order
            .get(&order_id)
            .map(|trades| trades.value().clone())
            .unwrap_or_default()
    }
}
