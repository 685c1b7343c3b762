//! Trade event fan-out
//!
//! Every trade produced by a book is pushed synchronously to each registered
//! [`TradeListener`], in registration order, before matching continues. A
//! listener that errors or panics is logged and skipped; the match itself is
//! never affected.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};
use types::trade::Trade;

/// Failure reported by a trade consumer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ListenerError {
    #[error("trade consumer failed: {0}")]
    Failed(String),

    #[error("trade consumer queue closed")]
    QueueClosed,
}

/// Consumer of executed trades
///
/// Called while the instrument's book is locked, so implementations that do
/// real work should hand it off rather than block.
pub trait TradeListener: Send + Sync {
    fn on_trade(&self, trade: &Trade) -> Result<(), ListenerError>;

    /// Label used in log lines
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

/// Outcome of delivering one trade to every listener
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub failed: usize,
}

/// Ordered set of trade listeners
#[derive(Clone, Default)]
pub struct TradeFanout {
    listeners: Vec<Arc<dyn TradeListener>>,
}

impl TradeFanout {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listeners(listeners: Vec<Arc<dyn TradeListener>>) -> Self {
        Self { listeners }
    }

    /// Append a listener; it will be called after all earlier ones
    pub fn register(&mut self, listener: Arc<dyn TradeListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver a trade to every listener, isolating failures
    pub fn dispatch(&self, trade: &Trade) -> DispatchReport {
        let mut report = DispatchReport::default();

        for listener in &self.listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener.on_trade(trade)));

            match outcome {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    report.failed += 1;
                    error!(
                        listener = listener.name(),
                        aggressing_order_id = %trade.aggressing_order_id,
                        resting_order_id = %trade.resting_order_id,
                        error = %err,
                        "Error processing trade"
                    );
                }
                Err(payload) => {
                    report.failed += 1;
                    error!(
                        listener = listener.name(),
                        aggressing_order_id = %trade.aggressing_order_id,
                        resting_order_id = %trade.resting_order_id,
                        panic = panic_message(payload.as_ref()),
                        "Trade listener panicked"
                    );
                }
            }
        }

        debug!(
            delivered = report.delivered,
            failed = report.failed,
            price = %trade.price,
            quantity = %trade.quantity,
            "Trade dispatched"
        );

        report
    }
}

impl std::fmt::Debug for TradeFanout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.listeners.iter().map(|l| l.name()))
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
