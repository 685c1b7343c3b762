//! Wires configuration, repositories and consumers into a running service

use std::sync::Arc;

use matching_engine::{SystemClock, TradeListener};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::config::ServiceConfig;
use crate::listeners::{QueuedListener, TradeRecorder, UserNotifier};
use crate::repository::{
    InMemoryOrderRepository, InMemoryTradeRepository, OrderRepository, TradeRepository,
};
use crate::service::OrderService;

/// Order service plus the background workers of its queued consumers
pub struct ServiceRuntime {
    service: Arc<OrderService>,
    workers: Vec<JoinHandle<()>>,
}

impl ServiceRuntime {
    /// Build the service with in-memory storage
    ///
    /// # Panics
    /// Panics if `config.queue_consumers` is set and this is called outside
    /// a tokio runtime
    pub fn start(config: &ServiceConfig) -> Self {
        Self::start_with(
            config,
            Arc::new(InMemoryOrderRepository::new()),
            Arc::new(InMemoryTradeRepository::new()),
        )
    }

    /// Build the service over caller-provided storage
    pub fn start_with(
        config: &ServiceConfig,
        orders: Arc<dyn OrderRepository>,
        trades: Arc<dyn TradeRepository>,
    ) -> Self {
        let mut listeners: Vec<Arc<dyn TradeListener>> = Vec::new();
        let mut workers = Vec::new();

        if config.record_trades {
            let recorder = TradeRecorder::new(trades.clone());
            listeners.push(attach(recorder, config.queue_consumers, &mut workers));
        }
        if config.notify_users {
            let notifier = UserNotifier::new(orders.clone());
            listeners.push(attach(notifier, config.queue_consumers, &mut workers));
        }

        let service = OrderService::new(orders, trades, listeners, Arc::new(SystemClock));
        info!(workers = workers.len(), "Order service started");

        Self {
            service: Arc::new(service),
            workers,
        }
    }

    pub fn service(&self) -> Arc<OrderService> {
        self.service.clone()
    }

    /// Stop accepting trades and wait for queued consumers to drain
    ///
    /// Queues close when the last handle to the service goes away, so any
    /// handle obtained from [`ServiceRuntime::service`] must be dropped first.
    pub async fn shutdown(self) {
        let outstanding = Arc::strong_count(&self.service) - 1;
        if outstanding > 0 {
            warn!(outstanding, "Service handles still alive, consumers will not drain until they drop");
        }
        drop(self.service);

        for worker in self.workers {
            if let Err(err) = worker.await {
                error!(error = %err, "Trade consumer worker failed");
            }
        }
        info!("Order service stopped");
    }
}

fn attach<L>(listener: L, queued: bool, workers: &mut Vec<JoinHandle<()>>) -> Arc<dyn TradeListener>
where
    L: TradeListener + 'static,
{
    if queued {
        let (queued, worker) = QueuedListener::spawn(listener);
        workers.push(worker);
        Arc::new(queued)
    } else {
        Arc::new(listener)
    }
}
