//! Concurrency tests
//!
//! Many threads place orders through one shared service. Whatever the
//! interleaving, the outcome must look like some sequential run: no order
//! fills past its quantity, every fill is recorded exactly once and the
//! stored orders agree with the books.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Utc;
use matching_engine::{SystemClock, TradeListener};
use order_service::listeners::TradeRecorder;
use order_service::repository::{InMemoryOrderRepository, InMemoryTradeRepository};
use order_service::OrderService;
use rust_decimal::Decimal;
use types::ids::{OrderId, Symbol, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

fn service() -> (Arc<OrderService>, Arc<InMemoryTradeRepository>) {
    let trades = Arc::new(InMemoryTradeRepository::new());
    let recorder: Arc<dyn TradeListener> = Arc::new(TradeRecorder::new(trades.clone()));
    let service = OrderService::new(
        Arc::new(InMemoryOrderRepository::new()),
        trades.clone(),
        vec![recorder],
        Arc::new(SystemClock),
    );
    (Arc::new(service), trades)
}

fn order(user: u64, symbol: &str, side: Side, price: u64, qty: u64) -> Order {
    Order::new(
        UserId::new(user),
        Symbol::new(symbol),
        side,
        Price::from_u64(price),
        Quantity::from_u64(qty),
        Utc::now(),
    )
    .unwrap()
}

#[test]
fn test_concurrent_markets() {
    let (service, trades) = service();
    let symbols = ["AAA", "BBB", "CCC", "DDD"];

    let handles: Vec<_> = symbols
        .into_iter()
        .map(|symbol| {
            let service = service.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    service.place_order(order(1, symbol, Side::SELL, 50, 1)).unwrap();
                    let result = service.place_order(order(2, symbol, Side::BUY, 50, 1)).unwrap();
                    assert_eq!(result.trades().len(), 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(trades.count(), 2000);
    for symbol in symbols {
        let snapshot = service.snapshot(&Symbol::new(symbol), 10).unwrap();
        assert!(snapshot.bids.is_empty() && snapshot.asks.is_empty());
    }
}

#[test]
fn test_same_instrument_from_many_threads() {
    const THREADS: u64 = 8;
    const PER_THREAD: u64 = 250;

    let (service, trades) = service();
    let barrier = Arc::new(Barrier::new(THREADS as usize));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let service = service.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for i in 0..PER_THREAD {
                    let side = if (t + i) % 2 == 0 { Side::BUY } else { Side::SELL };
                    let price = 99 + (t * 7 + i * 3) % 3;
                    let qty = 1 + (t + i * 5) % 5;
                    service.place_order(order(t, "XYZ", side, price, qty)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let total = THREADS * PER_THREAD;

    // Ids are dense and unique
    let stored: Vec<Order> = (1..=total)
        .map(|id| service.find_order(OrderId::new(id)).unwrap())
        .collect();
    assert!(service.find_order(OrderId::new(total + 1)).is_none());

    // Every stored fill is backed by recorded trades, and no trade is lost
    let mut trade_ids = HashSet::new();
    let mut traded = Decimal::ZERO;
    for order in &stored {
        assert!(order.check_invariant());
        let id = order.id.unwrap();
        let fills: Decimal = service
            .find_trades(id)
            .iter()
            .inspect(|t| {
                if t.aggressing_order_id == id {
                    trade_ids.insert(t.id.unwrap());
                }
            })
            .map(|t| t.quantity.as_decimal())
            .sum();
        assert_eq!(fills, order.filled_quantity().as_decimal(), "order {}", id);
        traded += fills;
    }
    assert_eq!(trade_ids.len(), trades.count());

    // The book holds exactly the stored orders that still have quantity left
    let book = service.registry().get(&Symbol::new("XYZ")).unwrap();
    let engine = book.lock();
    let mut resting: HashMap<OrderId, Quantity> = HashMap::new();
    for side in [Side::BUY, Side::SELL] {
        for order in engine.resting_orders(side) {
            resting.insert(order.id.unwrap(), order.remaining_quantity());
        }
    }
    for order in &stored {
        match resting.get(&order.id.unwrap()) {
            Some(remaining) => assert_eq!(*remaining, order.remaining_quantity()),
            None => assert!(order.is_filled()),
        }
    }

    if let (Some((bid, _)), Some((ask, _))) = (engine.best_bid(), engine.best_ask()) {
        assert!(bid < ask, "book crossed: {} >= {}", bid, ask);
    }

    // Each unit traded is counted once per side
    let submitted: Decimal = stored.iter().map(|o| o.quantity.as_decimal()).sum();
    let left: Decimal = resting.values().map(|q| q.as_decimal()).sum();
    assert_eq!(submitted, left + traded);
}

#[test]
fn test_concurrent_first_use_of_many_symbols() {
    let (service, _) = service();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u64)
        .map(|t| {
            let service = service.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                for symbol in ["NEW1", "NEW2", "NEW3"] {
                    service.place_order(order(t, symbol, Side::BUY, 10, 1)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(service.registry().len(), 3);
    for symbol in ["NEW1", "NEW2", "NEW3"] {
        let snapshot = service.snapshot(&Symbol::new(symbol), 1).unwrap();
        assert_eq!(snapshot.bids, vec![(Price::from_u64(10), Quantity::from_u64(8))]);
    }
}
