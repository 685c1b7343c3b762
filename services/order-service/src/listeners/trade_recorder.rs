use std::sync::Arc;

use matching_engine::{ListenerError, TradeListener};
use tracing::info;
use types::trade::Trade;

use crate::repository::TradeRepository;

/// Persists every executed trade
pub struct TradeRecorder {
    trades: Arc<dyn TradeRepository>,
}

impl TradeRecorder {
    pub fn new(trades: Arc<dyn TradeRepository>) -> Self {
        Self { trades }
    }
}

impl TradeListener for TradeRecorder {
    fn on_trade(&self, trade: &Trade) -> Result<(), ListenerError> {
        let saved = self.trades.save(trade.clone());
        info!(
            trade_id = ?saved.id.map(|id| id.value()),
            aggressing_order_id = %saved.aggressing_order_id,
            resting_order_id = %saved.resting_order_id,
            price = %saved.price,
            quantity = %saved.quantity,
            "Trade saved"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "trade-recorder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryTradeRepository;
    use chrono::Utc;
    use types::ids::{OrderId, TradeId};
    use types::numeric::{Price, Quantity};

    #[test]
    fn test_trade_is_saved() {
        let repo = Arc::new(InMemoryTradeRepository::new());
        let recorder = TradeRecorder::new(repo.clone());
        let trade = Trade::new(
            OrderId::new(2),
            OrderId::new(1),
            Price::from_u64(100),
            Quantity::from_u64(3),
            Utc::now(),
        );

        recorder.on_trade(&trade).unwrap();

        let saved = repo.find_by_order_id(OrderId::new(1));
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].id, Some(TradeId::new(1)));
        assert_eq!(saved[0].quantity, trade.quantity);
    }
}
