use std::sync::Arc;

use sea_orm::DatabaseConnection;

/// Shared by every handler; cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, environment: impl Into<Arc<str>>) -> Self {
        Self { db, environment: environment.into() }
    }
}
