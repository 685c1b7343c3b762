use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use types::errors::OrderError;
use types::ids::{Symbol, UserId};
use types::numeric::{Price, Quantity};
use types::order::{Order, Side};

/// Unvalidated order placement input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub ticker: String,
    pub price: Decimal,
    pub quantity: Decimal,
    #[serde(alias = "direction")]
    pub side: Side,
}

impl PlaceOrderRequest {
    pub fn new(ticker: impl Into<String>, price: Decimal, quantity: Decimal, side: Side) -> Self {
        Self {
            ticker: ticker.into(),
            price,
            quantity,
            side,
        }
    }

    /// Validate into an order owned by `user_id`
    pub fn into_order(self, user_id: UserId, created_at: DateTime<Utc>) -> Result<Order, OrderError> {
        let symbol = Symbol::try_new(self.ticker.trim())
            .ok_or_else(|| OrderError::InvalidSymbol(self.ticker.clone()))?;
        let price = Price::try_new(self.price)?;
        let quantity = Quantity::try_new(self.quantity)?;

        Order::new(user_id, symbol, self.side, price, quantity, created_at)
    }
}
