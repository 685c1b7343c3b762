//! Bid (buy-side) order book
//!
//! Maintains buy orders sorted by price descending (best bid first).
//! Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use types::numeric::{Price, Quantity};
use types::order::Order;

use super::price_level::PriceLevel;

/// Bid (buy) side order book
///
/// Orders are sorted by price descending, so the highest bid is first.
/// At each price level, orders are maintained in FIFO order.
#[derive(Debug, Clone)]
pub struct BidBook {
    /// Price levels keyed ascending; iterated from the back for priority
    levels: BTreeMap<Price, PriceLevel>,
}

impl BidBook {
    /// Create a new empty bid book
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
        }
    }

    /// Append an order to the tail of its price level
    pub fn insert(&mut self, order: Order) {
        self.levels
            .entry(order.price)
            .or_insert_with(PriceLevel::new)
            .insert(order);
    }

    /// Get the best bid (highest price)
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        // BTreeMap iter is ascending, so we need last()
        self.levels
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best bid price
    pub fn best_bid_price(&self) -> Option<Price> {
        self.levels.keys().next_back().copied()
    }

    /// Get mutable reference to the best bid level
    pub(crate) fn best_bid_level_mut(&mut self) -> Option<(Price, &mut PriceLevel)> {
        self.levels
            .iter_mut()
            .next_back()
            .map(|(price, level)| (*price, level))
    }

    /// Drop a price level once its queue has drained
    pub(crate) fn remove_level(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// Levels in priority order (highest price first)
    pub fn levels(&self) -> impl Iterator<Item = (&Price, &PriceLevel)> {
        self.levels.iter().rev()
    }

    /// Get depth snapshot (top N price levels)
    pub fn depth_snapshot(&self, depth: usize) -> Vec<(Price, Quantity)> {
        self.levels()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Check if the bid book is empty
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Get the total number of price levels
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of resting orders across all levels
    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::order_count).sum()
    }
}

impl Default for BidBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;
    use types::ids::{OrderId, Symbol, UserId};
    use types::order::Side;

    fn create_test_order(id: u64, price_val: u64, qty_str: &str) -> Order {
        Order::new(
            UserId::new(1),
            Symbol::new("BTC/USDT"),
            Side::BUY,
            Price::from_u64(price_val),
            Quantity::from_str(qty_str).unwrap(),
            Utc::now(),
        )
        .unwrap()
        .with_id(OrderId::new(id))
    }

    #[test]
    fn test_bid_book_insert() {
        let mut book = BidBook::new();
        book.insert(create_test_order(1, 50000, "1.5"));

        assert_eq!(book.level_count(), 1);
        assert!(!book.is_empty());
    }

    #[test]
    fn test_bid_book_best_bid() {
        let mut book = BidBook::new();

        book.insert(create_test_order(1, 50000, "1.0"));
        book.insert(create_test_order(2, 51000, "2.0")); // Higher price
        book.insert(create_test_order(3, 49000, "1.5")); // Lower price

        let (best_price, best_qty) = book.best_bid().unwrap();
        assert_eq!(best_price, Price::from_u64(51000)); // Highest price
        assert_eq!(best_qty, Quantity::from_str("2.0").unwrap());
        assert_eq!(book.best_bid_price(), Some(Price::from_u64(51000)));
    }

    #[test]
    fn test_bid_book_remove_level_only_when_empty() {
        let mut book = BidBook::new();
        book.insert(create_test_order(1, 50000, "1.0"));

        book.remove_level(Price::from_u64(50000));
        assert_eq!(book.level_count(), 1);

        let (_, level) = book.best_bid_level_mut().unwrap();
        assert!(level.fill_front(Quantity::from_str("1.0").unwrap()));
        book.remove_level(Price::from_u64(50000));
        assert!(book.is_empty());
    }

    #[test]
    fn test_bid_book_depth_snapshot() {
        let mut book = BidBook::new();

        book.insert(create_test_order(1, 50000, "1.0"));
        book.insert(create_test_order(2, 51000, "2.0"));
        book.insert(create_test_order(3, 49000, "1.5"));
        book.insert(create_test_order(4, 52000, "0.5"));

        let depth = book.depth_snapshot(2);

        // Should return top 2 levels (highest prices first)
        assert_eq!(depth.len(), 2);
        assert_eq!(depth[0].0, Price::from_u64(52000));
        assert_eq!(depth[1].0, Price::from_u64(51000));
    }

    #[test]
    fn test_bid_book_price_time_priority() {
        let mut book = BidBook::new();

        book.insert(create_test_order(1, 50000, "1.0"));
        book.insert(create_test_order(2, 50000, "2.0")); // Same price

        // Both orders at same price level
        assert_eq!(book.level_count(), 1);
        assert_eq!(book.order_count(), 2);

        let (price, total_qty) = book.best_bid().unwrap();
        assert_eq!(price, Price::from_u64(50000));
        assert_eq!(total_qty, Quantity::from_str("3.0").unwrap()); // 1.0 + 2.0
    }
}
