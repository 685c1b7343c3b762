//! One matching engine per instrument, created on first use

use std::sync::Arc;

use dashmap::DashMap;
use matching_engine::{Clock, MatchingEngine, TradeFanout};
use parking_lot::Mutex;
use tracing::info;
use types::ids::Symbol;

/// Shared handle to an instrument's engine
///
/// Everything that reads or changes the book goes through the mutex.
pub type BookHandle = Arc<Mutex<MatchingEngine>>;

/// Instrument to engine map
///
/// All engines share the same trade consumers and clock.
pub struct BookRegistry {
    books: DashMap<Symbol, BookHandle>,
    fanout: Arc<TradeFanout>,
    clock: Arc<dyn Clock>,
}

impl BookRegistry {
    pub fn new(fanout: Arc<TradeFanout>, clock: Arc<dyn Clock>) -> Self {
        Self {
            books: DashMap::new(),
            fanout,
            clock,
        }
    }

    /// Engine for `symbol`, creating it if this is the first order for it
    ///
    /// Concurrent first calls for the same symbol all get the same engine.
    pub fn book_for(&self, symbol: &Symbol) -> BookHandle {
        if let Some(book) = self.books.get(symbol) {
            return book.value().clone();
        }

        self.books
            .entry(symbol.clone())
            .or_insert_with(|| {
                info!(symbol = %symbol, "Creating order book");
                Arc::new(Mutex::new(MatchingEngine::new(
                    symbol.clone(),
                    self.fanout.clone(),
                    self.clock.clone(),
                )))
            })
            .value()
            .clone()
    }

    /// Engine for `symbol` if one exists
    pub fn get(&self, symbol: &Symbol) -> Option<BookHandle> {
        self.books.get(symbol).map(|book| book.value().clone())
    }

    /// Instruments with a book, sorted
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.books.iter().map(|e| e.key().clone()).collect();
        symbols.sort();
        symbols
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl std::fmt::Debug for BookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookRegistry")
            .field("symbols", &self.symbols())
            .field("fanout", &self.fanout)
            .finish()
    }
}
