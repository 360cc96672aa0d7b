use sea_orm::DatabaseConnection;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, safe for concurrent use
    pub db: DatabaseConnection,
}

impl AppState {
    /// Create new application state
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}
