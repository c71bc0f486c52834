//! Full-response cache for the index listing.
//!
//! Keyed by path + query, bounded by a TTL. New posts do not invalidate an
//! entry; they show up once the entry expires or `clear` is called.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use crate::context::AppContext;
use crate::error::Error;

#[derive(Clone)]
struct CachedPage {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    stored_at: Instant,
}

#[derive(Clone)]
pub struct PageCache {
    entries: Arc<RwLock<HashMap<String, CachedPage>>>,
    ttl: Duration,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn get(&self, key: &str) -> Option<CachedPage> {
        let entries = self.entries.read().expect("page cache lock poisoned");
        let entry = entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }

        Some(entry.clone())
    }

    fn put(&self, key: String, entry: CachedPage) {
        let mut entries = self.entries.write().expect("page cache lock poisoned");
        entries.insert(key, entry);
    }

    pub fn clear(&self) {
        let mut entries = self.entries.write().expect("page cache lock poisoned");
        entries.clear();
    }
}

fn cache_key(request: &Request) -> String {
    match request.uri().query() {
        Some(query) => format!("{}?{}", request.uri().path(), query),
        None => request.uri().path().to_string(),
    }
}

/// Serve successful GET responses from the cache for the route this layers.
pub async fn page_cache(
    State(context): State<AppContext>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = cache_key(&request);
    if let Some(hit) = context.cache.get(&key) {
        debug!(%key, "serving cached page");
        let mut response = Response::new(Body::from(hit.body));
        *response.status_mut() = hit.status;
        *response.headers_mut() = hit.headers;
        return response;
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            return Error::from(anyhow::anyhow!("buffering response for cache: {error}"))
                .into_response()
        }
    };

    context.cache.put(
        key,
        CachedPage {
            status: parts.status,
            headers: parts.headers.clone(),
            body: bytes.clone(),
            stored_at: Instant::now(),
        },
    );

    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(body: &str) -> CachedPage {
        CachedPage {
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::copy_from_slice(body.as_bytes()),
            stored_at: Instant::now(),
        }
    }

    #[test]
    fn hit_before_expiry() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put("/".to_string(), page("hello"));
        assert!(cache.get("/").is_some());
        assert!(cache.get("/?page=2").is_none());
    }

    #[test]
    fn expired_entries_are_misses() {
        let cache = PageCache::new(Duration::ZERO);
        cache.put("/".to_string(), page("hello"));
        assert!(cache.get("/").is_none());
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache = PageCache::new(Duration::from_secs(60));
        cache.put("/".to_string(), page("hello"));
        cache.clear();
        assert!(cache.get("/").is_none());
    }
}
