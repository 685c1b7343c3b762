use std::sync::Arc;

use matching_engine::{ListenerError, TradeFanout, TradeListener};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use types::trade::Trade;

/// Hands trades to a background task that runs the wrapped consumer
///
/// `on_trade` only enqueues, so the book lock is released without waiting
/// for the consumer. Trades reach the consumer in the order they were
/// dispatched. The worker exits once every clone of the sender is dropped
/// and the queue is drained.
#[derive(Clone)]
pub struct QueuedListener {
    name: String,
    sender: mpsc::UnboundedSender<Trade>,
}

impl QueuedListener {
    /// Start the worker on the current tokio runtime
    ///
    /// # Panics
    /// Panics if called outside a tokio runtime
    pub fn spawn<L>(inner: L) -> (Self, JoinHandle<()>)
    where
        L: TradeListener + 'static,
    {
        let name = format!("queued:{}", inner.name());
        let (sender, mut receiver) = mpsc::unbounded_channel::<Trade>();

        // A single-consumer fan-out gives the worker the same error and
        // panic isolation as synchronous dispatch.
        let worker = TradeFanout::with_listeners(vec![Arc::new(inner) as Arc<dyn TradeListener>]);
        let worker_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut processed = 0u64;
            while let Some(trade) = receiver.recv().await {
                worker.dispatch(&trade);
                processed += 1;
            }
            debug!(listener = %worker_name, processed, "Trade queue drained");
        });

        (Self { name, sender }, handle)
    }

    /// Whether the worker has stopped receiving
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

impl TradeListener for QueuedListener {
    fn on_trade(&self, trade: &Trade) -> Result<(), ListenerError> {
        self.sender.send(trade.clone()).map_err(|_| {
            warn!(listener = %self.name, "Trade queue closed");
            ListenerError::QueueClosed
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::sync::Mutex;
    use types::ids::OrderId;
    use types::numeric::{Price, Quantity};

    struct Collect(Arc<Mutex<Vec<u64>>>);

    impl TradeListener for Collect {
        fn on_trade(&self, trade: &Trade) -> Result<(), ListenerError> {
            self.0.lock().unwrap().push(trade.resting_order_id.value());
            Ok(())
        }
    }

    struct Explode;

    impl TradeListener for Explode {
        fn on_trade(&self, _trade: &Trade) -> Result<(), ListenerError> {
            panic!("consumer failure");
        }
    }

    fn trade(resting: u64) -> Trade {
        Trade::new(
            OrderId::new(100),
            OrderId::new(resting),
            Price::from_u64(10),
            Quantity::from_u64(1),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_trades_delivered_in_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let (queued, worker) = QueuedListener::spawn(Collect(seen.clone()));

        for id in 1..=5 {
            queued.on_trade(&trade(id)).unwrap();
        }
        drop(queued);
        worker.await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_worker_survives_panicking_consumer() {
        let (queued, worker) = QueuedListener::spawn(Explode);

        queued.on_trade(&trade(1)).unwrap();
        queued.on_trade(&trade(2)).unwrap();
        drop(queued);

        assert!(worker.await.is_ok());
    }

    #[tokio::test]
    async fn test_send_after_worker_stopped() {
        let (queued, worker) = QueuedListener::spawn(Collect(Arc::new(Mutex::new(Vec::new()))));
        worker.abort();
        let _ = worker.await;

        assert!(queued.is_closed());
        assert_eq!(queued.on_trade(&trade(1)), Err(ListenerError::QueueClosed));
    }

    #[test]
    fn test_name_wraps_inner() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let _guard = runtime.enter();
        let (queued, _worker) = QueuedListener::spawn(Collect(Arc::new(Mutex::new(Vec::new()))));

        assert!(queued.name().starts_with("queued:"));
        assert!(queued.name().contains("Collect"));
    }
}
