//! Shared application state.

use ventas_db::Database;

/// State handed to every handler. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}
