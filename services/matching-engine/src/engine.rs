//! Matching engine core
//!
//! One engine owns the bid and ask ledgers of a single instrument and runs
//! match-then-rest for every submitted order.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::info;
use types::ids::{OrderId, Symbol};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};
use types::trade::Trade;

use crate::book::{AskBook, BidBook, PriceLevel};
use crate::clock::{Clock, SystemClock};
use crate::events::TradeFanout;
use crate::matching::{crossing, MatchExecutor};

/// Order book and matcher for one instrument
///
/// All mutation goes through [`MatchingEngine::submit`], which takes
/// `&mut self`; callers sharing an engine wrap it in a lock.
pub struct MatchingEngine {
    symbol: Symbol,
    bids: BidBook,
    asks: AskBook,
    /// Trade construction, timestamped by the injected clock
    executor: MatchExecutor,
    fanout: Arc<TradeFanout>,
}

/// Result of submitting an order
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitResult {
    /// No match; the order rests in full
    Resting(Order),
    /// Some quantity traded; the remainder rests
    PartiallyFilled { order: Order, trades: Vec<Trade> },
    /// Order was completely filled and never rested
    Filled { order: Order, trades: Vec<Trade> },
}

impl SubmitResult {
    /// Post-match state of the submitted order
    pub fn order(&self) -> &Order {
        match self {
            SubmitResult::Resting(order)
            | SubmitResult::PartiallyFilled { order, .. }
            | SubmitResult::Filled { order, .. } => order,
        }
    }

    pub fn trades(&self) -> &[Trade] {
        match self {
            SubmitResult::Resting(_) => &[],
            SubmitResult::PartiallyFilled { trades, .. } | SubmitResult::Filled { trades, .. } => {
                trades
            }
        }
    }

    pub fn into_order(self) -> Order {
        match self {
            SubmitResult::Resting(order)
            | SubmitResult::PartiallyFilled { order, .. }
            | SubmitResult::Filled { order, .. } => order,
        }
    }
}

/// Order book snapshot, best levels first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSnapshot {
    pub symbol: Symbol,
    pub bids: Vec<(Price, Quantity)>,
    pub asks: Vec<(Price, Quantity)>,
}

/// Engine errors
///
/// Both variants are caller bugs and are never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Order id is required")]
    MissingOrderId,

    #[error("Order for {actual} submitted to the {expected} book")]
    SymbolMismatch { expected: Symbol, actual: Symbol },
}

impl MatchingEngine {
    pub fn new(symbol: Symbol, fanout: Arc<TradeFanout>, clock: Arc<dyn Clock>) -> Self {
        Self {
            symbol,
            bids: BidBook::new(),
            asks: AskBook::new(),
            executor: MatchExecutor::new(clock),
            fanout,
        }
    }

    /// Engine with no listeners, stamping trades with wall-clock time
    pub fn with_defaults(symbol: Symbol) -> Self {
        Self::new(symbol, Arc::new(TradeFanout::new()), Arc::new(SystemClock))
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Submit an order to the book
    ///
    /// Matches against the opposite side under price-time priority, pushing
    /// each trade through the fan-out as it happens, then rests whatever is
    /// left at the order's own limit price.
    pub fn submit(&mut self, mut order: Order) -> Result<SubmitResult, EngineError> {
        let order_id = order.id.ok_or(EngineError::MissingOrderId)?;
        if order.symbol != self.symbol {
            return Err(EngineError::SymbolMismatch {
                expected: self.symbol.clone(),
                actual: order.symbol,
            });
        }

        let trades = match order.side {
            Side::BUY => self.match_buy_order(&mut order, order_id),
            Side::SELL => self.match_sell_order(&mut order, order_id),
        };

        if order.is_filled() {
            return Ok(SubmitResult::Filled { order, trades });
        }

        match order.side {
            Side::BUY => self.bids.insert(order.clone()),
            Side::SELL => self.asks.insert(order.clone()),
        }

        if trades.is_empty() {
            Ok(SubmitResult::Resting(order))
        } else {
            Ok(SubmitResult::PartiallyFilled { order, trades })
        }
    }

    /// Match incoming buy order against asks, lowest price first
    fn match_buy_order(&mut self, order: &mut Order, order_id: OrderId) -> Vec<Trade> {
        let mut trades = Vec::new();

        while !order.is_filled() {
            let Some((ask_price, ask_level)) = self.asks.best_ask_level_mut() else {
                break;
            };
            if !crossing::incoming_can_match(Side::BUY, order.price, ask_price) {
                break;
            }

            Self::fill_against_level(
                ask_level,
                ask_price,
                order,
                order_id,
                &self.executor,
                &self.fanout,
                &mut trades,
            );

            self.asks.remove_level(ask_price);
        }

        trades
    }

    /// Match incoming sell order against bids, highest price first
    fn match_sell_order(&mut self, order: &mut Order, order_id: OrderId) -> Vec<Trade> {
        let mut trades = Vec::new();

        while !order.is_filled() {
            let Some((bid_price, bid_level)) = self.bids.best_bid_level_mut() else {
                break;
            };
            if !crossing::incoming_can_match(Side::SELL, order.price, bid_price) {
                break;
            }

            Self::fill_against_level(
                bid_level,
                bid_price,
                order,
                order_id,
                &self.executor,
                &self.fanout,
                &mut trades,
            );

            self.bids.remove_level(bid_price);
        }

        trades
    }

    /// Walk one price level oldest-first until it or the incoming order runs out
    fn fill_against_level(
        level: &mut PriceLevel,
        level_price: Price,
        order: &mut Order,
        order_id: OrderId,
        executor: &MatchExecutor,
        fanout: &TradeFanout,
        trades: &mut Vec<Trade>,
    ) {
        while !order.is_filled() {
            let Some((resting_id, resting_quantity)) = level.peek_front() else {
                break;
            };

            let match_qty = order.remaining_quantity().min(resting_quantity);
            level.fill_front(match_qty);
            order.fill(match_qty);

            // Execution price is the resting order's price
            let trade = executor.execute_trade(order_id, resting_id, level_price, match_qty);
            info!(
                aggressing_order_id = %order_id,
                resting_order_id = %resting_id,
                price = %level_price,
                quantity = %match_qty,
                "Order matched"
            );

            fanout.dispatch(&trade);
            trades.push(trade);
        }
    }

    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        self.bids.best_bid()
    }

    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        self.asks.best_ask()
    }

    pub fn bids(&self) -> &BidBook {
        &self.bids
    }

    pub fn asks(&self) -> &AskBook {
        &self.asks
    }

    /// Get order book snapshot, aggregated per level
    pub fn depth_snapshot(&self, depth: usize) -> BookSnapshot {
        BookSnapshot {
            symbol: self.symbol.clone(),
            bids: self.bids.depth_snapshot(depth),
            asks: self.asks.depth_snapshot(depth),
        }
    }

    /// Resting orders on one side in matching priority order
    pub fn resting_orders(&self, side: Side) -> Vec<&Order> {
        match side {
            Side::BUY => self.bids.levels().flat_map(|(_, level)| level.iter()).collect(),
            Side::SELL => self.asks.levels().flat_map(|(_, level)| level.iter()).collect(),
        }
    }

    pub fn order_count(&self) -> usize {
        self.bids.order_count() + self.asks.order_count()
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }
}

impl std::fmt::Debug for MatchingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchingEngine")
            .field("symbol", &self.symbol)
            .field("bids", &self.bids)
            .field("asks", &self.asks)
            .field("fanout", &self.fanout)
            .finish()
    }
}
