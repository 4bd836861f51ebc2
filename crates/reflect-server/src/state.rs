//! Application state for the Reflect server.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use reflect_core::{Config, EntryStore, Placement, ServerConfig};
use tokio::sync::{Mutex, MutexGuard};

use crate::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Entry store backing the reflections API.
    pub store: Arc<EntryStore>,
    /// Where entries created over HTTP are inserted.
    pub placement: Placement,
    /// Page and static file locations.
    pub server: Arc<ServerConfig>,
    /// Held across every load-mutate-save sequence so that concurrent
    /// requests in this process never lose each other's writes.
    write_lock: Arc<Mutex<()>>,
}

impl AppState {
    /// Create the state described by `config`.
    pub fn new(config: &Config) -> Self {
        Self::with_store(config.store(), config.server_placement, config.server.clone())
    }

    /// Create state around an existing store.
    pub fn with_store(store: EntryStore, placement: Placement, server: ServerConfig) -> Self {
        Self {
            store: Arc::new(store),
            placement,
            server: Arc::new(server),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Wait for exclusive write access to the entries file.
    pub async fn lock_writes(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().await
    }

    /// Run a blocking store operation off the async runtime.
    pub async fn with_store_blocking<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&EntryStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        let value = tokio::task::spawn_blocking(move || f(&store)).await?;
        Ok(value)
    }
}
