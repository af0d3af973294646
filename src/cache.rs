// src/cache.rs

use std::{
    num::NonZeroUsize,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use axum::{
    body::{Body, Bytes, to_bytes},
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use lru::LruCache;

/// Key prefix for the cached home page.
pub const INDEX_PAGE_PREFIX: &str = "index_page:";

/// Most pages kept at once; the least recently used one is evicted first.
pub const PAGE_CACHE_CAPACITY: usize = 300;

/// A fully rendered response kept by the page cache.
#[derive(Debug, Clone)]
pub struct CachedPage {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl IntoResponse for CachedPage {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

struct Entry {
    page: CachedPage,
    expires_at: Instant,
}

/// In-process full-page cache with a fixed time-to-live and a bounded
/// number of entries.
///
/// Writes elsewhere in the application never touch it: a cached page stays
/// as rendered until it expires, is evicted, or is invalidated explicitly.
#[derive(Clone)]
pub struct PageCache {
    entries: Arc<Mutex<LruCache<String, Entry>>>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_capacity(ttl, PAGE_CACHE_CAPACITY)
    }

    pub fn with_capacity(ttl: Duration, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Arc::new(Mutex::new(LruCache::new(capacity))),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn capacity(&self) -> usize {
        self.entries().cap().get()
    }

    fn entries(&self) -> MutexGuard<'_, LruCache<String, Entry>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns the page stored under `key` unless it has expired.
    pub fn get(&self, key: &str) -> Option<CachedPage> {
        let mut entries = self.entries();
        let live = entries.get(key)?.expires_at > Instant::now();
        if live {
            entries.get(key).map(|entry| entry.page.clone())
        } else {
            entries.pop(key);
            None
        }
    }

    pub fn insert(&self, key: impl Into<String>, page: CachedPage) {
        let entry = Entry {
            page,
            expires_at: Instant::now() + self.ttl,
        };
        let mut entries = self.entries();
        if let Some((evicted, _)) = entries.push(key.into(), entry) {
            tracing::trace!("Page cache dropped {}", evicted);
        }
    }

    /// Drops every entry whose key starts with `prefix`.
    /// Returns how many entries were removed.
    pub fn invalidate(&self, prefix: &str) -> usize {
        let mut entries = self.entries();
        let doomed: Vec<String> = entries
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        doomed.len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    /// Number of live (unexpired) entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries()
            .iter()
            .filter(|(_, entry)| entry.expires_at > now)
            .count()
    }

    /// Number of stored entries, expired or not.
    pub fn stored(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Axum Middleware: serves GET requests from the page cache.
///
/// On a miss the inner response is buffered and stored when it is `200 OK`.
/// Keys are the request URI, so every `?page=` gets its own entry.
pub async fn cache_index_page(
    State(cache): State<PageCache>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.method() != Method::GET {
        return next.run(req).await;
    }

    let key = format!("{}{}", INDEX_PAGE_PREFIX, req.uri());
    if let Some(page) = cache.get(&key) {
        tracing::debug!("Page cache hit: {}", key);
        return page.into_response();
    }

    let response = next.run(req).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to buffer response for page cache: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    cache.insert(
        key,
        CachedPage {
            status: parts.status,
            headers: parts.headers.clone(),
            body: bytes.clone(),
        },
    );

    Response::from_parts(parts, Body::from(bytes))
}
