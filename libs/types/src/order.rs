//! Limit order types
//!
//! An order is immutable apart from its remaining quantity, which only ever
//! goes down through [`Order::fill`].

use crate::errors::OrderError;
use crate::ids::{OrderId, Symbol, UserId};
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order (bid)
    #[serde(alias = "BID")]
    BUY,
    /// Sell order (ask)
    #[serde(alias = "ASK")]
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::BUY => write!(f, "BUY"),
            Side::SELL => write!(f, "SELL"),
        }
    }
}

/// How much of an order has executed so far
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FillStatus {
    New,
    PartiallyFilled,
    Filled,
}

/// Limit order
///
/// `id` is `None` until the order repository assigns one; the book refuses
/// orders without it. Decoding applies the same checks as [`Order::new`]
/// plus `remaining_quantity <= quantity`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "OrderRecord")]
pub struct Order {
    pub id: Option<OrderId>,
    pub user_id: UserId,
    pub symbol: Symbol,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    remaining_quantity: Quantity,
    /// Submission time, display only. Book priority is arrival order.
    pub created_at: DateTime<Utc>,
}

/// Wire shape of [`Order`], validated before it becomes one
#[derive(Deserialize)]
struct OrderRecord {
    id: Option<OrderId>,
    user_id: UserId,
    symbol: Symbol,
    side: Side,
    price: Price,
    quantity: Quantity,
    remaining_quantity: Quantity,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRecord> for Order {
    type Error = OrderError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        if Symbol::try_new(record.symbol.as_str()).is_none() {
            return Err(OrderError::InvalidSymbol(record.symbol.as_str().to_string()));
        }

        let mut order = Order::new(
            record.user_id,
            record.symbol,
            record.side,
            record.price,
            record.quantity,
            record.created_at,
        )?;

        if record.remaining_quantity > order.quantity {
            return Err(OrderError::InvalidQuantity(format!(
                "remaining quantity {} exceeds quantity {}",
                record.remaining_quantity, order.quantity
            )));
        }
        order.remaining_quantity = record.remaining_quantity;
        order.id = record.id;
        Ok(order)
    }
}

impl Order {
    /// Create a new order without an identifier
    pub fn new(
        user_id: UserId,
        symbol: Symbol,
        side: Side,
        price: Price,
        quantity: Quantity,
        created_at: DateTime<Utc>,
    ) -> Result<Self, OrderError> {
        if !quantity.is_positive() {
            return Err(OrderError::InvalidQuantity(format!(
                "quantity must be greater than 0, got {}",
                quantity
            )));
        }

        Ok(Self {
            id: None,
            user_id,
            symbol,
            side,
            price,
            quantity,
            remaining_quantity: quantity,
            created_at,
        })
    }

    /// Stamp the identifier
    ///
    /// # Panics
    /// Panics if the order already has one; ids are assigned exactly once
    pub fn with_id(mut self, id: OrderId) -> Self {
        assert!(self.id.is_none(), "Order id already assigned");
        self.id = Some(id);
        self
    }

    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_quantity
    }

    pub fn filled_quantity(&self) -> Quantity {
        self.quantity - self.remaining_quantity
    }

    /// Check quantity invariant: 0 <= remaining <= quantity
    pub fn check_invariant(&self) -> bool {
        self.remaining_quantity <= self.quantity
    }

    pub fn is_filled(&self) -> bool {
        self.remaining_quantity.is_zero()
    }

    pub fn has_fills(&self) -> bool {
        self.remaining_quantity < self.quantity
    }

    pub fn fill_status(&self) -> FillStatus {
        if self.is_filled() {
            FillStatus::Filled
        } else if self.has_fills() {
            FillStatus::PartiallyFilled
        } else {
            FillStatus::New
        }
    }

    /// Reduce the remaining quantity by an executed amount
    ///
    /// # Panics
    /// Panics if the fill exceeds the remaining quantity
    pub fn fill(&mut self, fill_quantity: Quantity) {
        assert!(
            fill_quantity <= self.remaining_quantity,
            "Fill would exceed remaining quantity"
        );
        self.remaining_quantity = self.remaining_quantity - fill_quantity;
    }
}
