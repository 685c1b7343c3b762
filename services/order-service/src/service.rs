//! Order placement coordinator
//!
//! Each placement locks the instrument's engine before the order is given
//! its id, so ids within one instrument follow book arrival order. Orders
//! for different instruments never wait on each other.

use std::sync::Arc;

use matching_engine::{BookSnapshot, Clock, SubmitResult, SystemClock, TradeFanout, TradeListener};
use tracing::info;
use types::ids::{OrderId, Symbol, UserId};
use types::order::Order;
use types::trade::Trade;

use crate::error::ServiceError;
use crate::listeners::FillTracker;
use crate::models::PlaceOrderRequest;
use crate::registry::BookRegistry;
use crate::repository::{OrderRepository, TradeRepository};

pub struct OrderService {
    registry: BookRegistry,
    orders: Arc<dyn OrderRepository>,
    trades: Arc<dyn TradeRepository>,
    clock: Arc<dyn Clock>,
}

impl OrderService {
    /// Build a service whose books report trades to `listeners`
    ///
    /// A [`FillTracker`] is always registered first so stored orders carry
    /// their fills before any other consumer reads them.
    pub fn new(
        orders: Arc<dyn OrderRepository>,
        trades: Arc<dyn TradeRepository>,
        listeners: Vec<Arc<dyn TradeListener>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut fanout = TradeFanout::new();
        fanout.register(Arc::new(FillTracker::new(orders.clone())));
        for listener in listeners {
            fanout.register(listener);
        }
        info!(listeners = ?fanout, "Trade consumers registered");

        Self {
            registry: BookRegistry::new(Arc::new(fanout), clock.clone()),
            orders,
            trades,
            clock,
        }
    }

    /// Wall clock, no extra consumers
    pub fn with_repositories(
        orders: Arc<dyn OrderRepository>,
        trades: Arc<dyn TradeRepository>,
    ) -> Self {
        Self::new(orders, trades, Vec::new(), Arc::new(SystemClock))
    }

    /// Place a new order and match it against its instrument's book
    ///
    /// The order must not have an id yet. The returned order carries its
    /// assigned id and its state after matching.
    pub fn place_order(&self, order: Order) -> Result<SubmitResult, ServiceError> {
        if let Some(id) = order.id {
            return Err(ServiceError::IdAlreadyAssigned(id));
        }

        let book = self.registry.book_for(&order.symbol);

        let result = {
            let mut engine = book.lock();
            let order = self.orders.save(order);
            engine.submit(order)?
        };

        let order = result.order();
        info!(
            order_id = ?order.id.map(|id| id.value()),
            user_id = %order.user_id,
            symbol = %order.symbol,
            side = %order.side,
            price = %order.price,
            remaining = %order.remaining_quantity(),
            trades = result.trades().len(),
            "Order placed"
        );

        Ok(result)
    }

    /// Validate a request on behalf of `user_id` and place it
    pub fn submit_request(
        &self,
        user_id: UserId,
        request: PlaceOrderRequest,
    ) -> Result<SubmitResult, ServiceError> {
        let order = request.into_order(user_id, self.clock.now())?;
        self.place_order(order)
    }

    /// Stored state of an order, including fills applied since placement
    pub fn find_order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.find_by_id(order_id)
    }

    /// Trades an order took part in; empty if it has none yet
    pub fn find_trades(&self, order_id: OrderId) -> Vec<Trade> {
        self.trades.find_by_order_id(order_id)
    }

    /// Stored order, visible only to its owner
    pub fn order_for_owner(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Order, ServiceError> {
        let order = self
            .find_order(order_id)
            .ok_or(ServiceError::OrderNotFound(order_id))?;

        if order.user_id != user_id {
            return Err(ServiceError::NotOrderOwner { order_id, user_id });
        }
        Ok(order)
    }

    /// Trades for an order, visible only to the order's owner
    pub fn trades_for_owner(
        &self,
        user_id: UserId,
        order_id: OrderId,
    ) -> Result<Vec<Trade>, ServiceError> {
        self.order_for_owner(user_id, order_id)?;
        Ok(self.find_trades(order_id))
    }

    /// Top `depth` levels of an instrument's book, `None` if it has none
    pub fn snapshot(&self, symbol: &Symbol, depth: usize) -> Option<BookSnapshot> {
        self.registry
            .get(symbol)
            .map(|book| book.lock().depth_snapshot(depth))
    }

    pub fn registry(&self) -> &BookRegistry {
        &self.registry
    }
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
