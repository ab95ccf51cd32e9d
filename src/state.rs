use std::sync::Arc;

use crate::auth::{AuthService, TokenKeys};
use crate::config::Config;
use crate::store::{MemoryStore, TaskStore, UserStore};
use crate::tasks::TaskService;

/// Services shared by all workers, registered once as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub tasks: TaskService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        tasks: Arc<dyn TaskStore>,
        keys: TokenKeys,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            auth: AuthService::new(users, keys, bcrypt_cost),
            tasks: TaskService::new(tasks),
        }
    }

    /// Wires both services to the same store, as the binary does with its pool.
    pub fn from_config<S>(store: S, config: &Config) -> Self
    where
        S: UserStore + TaskStore + 'static,
    {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store,
            TokenKeys::new(&config.jwt_secret, config.token_ttl),
            config.bcrypt_cost,
        )
    }

    /// State backed by a fresh `MemoryStore`.
    pub fn in_memory(secret: &str, token_ttl: chrono::Duration, bcrypt_cost: u32) -> Self {
        Self::with_memory_store(MemoryStore::new(), secret, token_ttl, bcrypt_cost)
    }

    /// Like `in_memory`, but over a store the caller keeps a handle to.
    pub fn with_memory_store(
        store: MemoryStore,
        secret: &str,
        token_ttl: chrono::Duration,
        bcrypt_cost: u32,
    ) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store,
            TokenKeys::new(secret, token_ttl),
            bcrypt_cost,
        )
    }
}
