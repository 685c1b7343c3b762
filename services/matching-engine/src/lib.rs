//! Matching Engine
//!
//! Price-time priority limit order matching for a single instrument.
//!
//! **Key Invariants:**
//! - Better price first, then earlier arrival within a price
//! - Trades execute at the resting order's price
//! - No empty price levels; no fully filled order rests
//! - Every trade reaches every listener, in generation order, before the
//!   next match is attempted

pub mod book;
pub mod clock;
pub mod matching;
pub mod engine;
pub mod events;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{BookSnapshot, EngineError, MatchingEngine, SubmitResult};
pub use events::{DispatchReport, ListenerError, TradeFanout, TradeListener};
