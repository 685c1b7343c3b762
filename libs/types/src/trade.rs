//! Trade execution types
//!
//! A trade records one fill between the incoming (aggressing) order and a
//! resting order. It always executes at the resting order's price.

use crate::ids::{OrderId, TradeId};
use crate::numeric::{Price, Quantity};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Executed trade
///
/// `id` is `None` until the trade repository records it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Option<TradeId>,
    /// Order that arrived and caused the match
    pub aggressing_order_id: OrderId,
    /// Order that was already in the book
    pub resting_order_id: OrderId,
    pub price: Price,
    pub quantity: Quantity,
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    /// Create a new, not yet recorded trade
    pub fn new(
        aggressing_order_id: OrderId,
        resting_order_id: OrderId,
        price: Price,
        quantity: Quantity,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            aggressing_order_id,
            resting_order_id,
            price,
            quantity,
            executed_at,
        }
    }

    /// Copy of this trade carrying a recorded identifier
    pub fn with_id(&self, id: TradeId) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    /// Calculate trade value (price × quantity)
    pub fn notional(&self) -> Decimal {
        self.quantity.as_decimal() * self.price.as_decimal()
    }

    /// Whether the given order took part in this trade
    pub fn involves(&self, order_id: OrderId) -> bool {
        self.aggressing_order_id == order_id || self.resting_order_id == order_id
    }
}
