use crate::exchange::Exchange;
use std::sync::{Arc, Mutex};

/// Shared application state.
///
/// The mutex is the per-exchange exclusion: every handler that touches a
/// book takes it, and all mutations to a book happen in a total order.
/// Settlement runs after the guard is dropped.
#[derive(Clone)]
pub struct AppState {
    pub exchange: Arc<Mutex<Exchange>>,
}

impl AppState {
    pub fn new(exchange: Exchange) -> Self {
        Self {
            exchange: Arc::new(Mutex::new(exchange)),
        }
    }
}
