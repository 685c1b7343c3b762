//! Trade consumers registered with every book
//!
//! - `FillTracker`: keeps stored orders' remaining quantity in step with the book
//! - `TradeRecorder`: persists trades
//! - `UserNotifier`: tells both order owners about the fill
//! - `QueuedListener`: runs another consumer off the matching path

mod fill_tracker;
mod notifier;
mod queued;
mod trade_recorder;

pub use fill_tracker::FillTracker;
pub use notifier::UserNotifier;
pub use queued::QueuedListener;
pub use trade_recorder::TradeRecorder;
