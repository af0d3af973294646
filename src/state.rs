use crate::{cache::PageCache, config::Config};
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    pub page_cache: PageCache,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let page_cache = PageCache::new(std::time::Duration::from_secs(config.index_cache_ttl));
        Self {
            pool,
            config,
            page_cache,
        }
    }
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for PageCache {
    fn from_ref(state: &AppState) -> Self {
        state.page_cache.clone()
    }
}
