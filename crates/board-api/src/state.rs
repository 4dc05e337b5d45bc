use std::sync::Arc;

use board_db::Database;

use crate::error::AppError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

impl AppStateInner {
    pub fn new(db: Database) -> AppState {
        Arc::new(Self { db })
    }
}

/// Runs a database call on the blocking pool so rusqlite never stalls the
/// async workers.
pub async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, AppError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    Ok(tokio::task::spawn_blocking(move || f(&state.db)).await??)
}
