// src/resolution/cache.rs
use log::info;
use lru::LruCache;
use std::num::NonZeroUsize;

use crate::models::matching::Resolution;

// Default cache size - can be configured via environment variable
const DEFAULT_CACHE_SIZE: usize = 2048;

/// Explicit key-value store for name-resolution results, passed by reference to whoever
/// resolves names. Keys are the raw transaction names.
pub trait ResolutionCache {
    /// Returns a copy of the cached resolution and counts a hit, or counts a miss.
    fn get(&mut self, name: &str) -> Option<Resolution>;
    fn insert(&mut self, name: &str, resolution: Resolution);
    fn clear(&mut self);
    /// (hits, misses)
    fn stats(&self) -> (usize, usize);
}

/// In-memory LRU implementation of [`ResolutionCache`].
pub struct LruResolutionCache {
    cache: LruCache<String, Resolution>,
    hits: usize,
    misses: usize,
}

impl Default for LruResolutionCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_SIZE)
    }
}

impl LruResolutionCache {
    /// Capacity from `RESOLUTION_CACHE_SIZE`, falling back to the default.
    pub fn from_env() -> Self {
        let cache_size = std::env::var("RESOLUTION_CACHE_SIZE")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(DEFAULT_CACHE_SIZE);

        info!(
            "Initializing resolution cache with cache size: {}",
            cache_size
        );
        Self::with_capacity(cache_size)
    }

    /// A zero capacity is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

impl ResolutionCache for LruResolutionCache {
    fn get(&mut self, name: &str) -> Option<Resolution> {
        match self.cache.get(name) {
            Some(resolution) => {
                self.hits += 1;
                if self.hits % 100 == 0 {
                    info!(
                        "Resolution cache stats - hits: {}, misses: {}, hit rate: {:.2}%",
                        self.hits,
                        self.misses,
                        (self.hits as f64 / (self.hits + self.misses) as f64) * 100.0
                    );
                }
                Some(resolution.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    fn insert(&mut self, name: &str, resolution: Resolution) {
        self.cache.put(name.to_string(), resolution);
    }

    fn clear(&mut self) {
        self.cache.clear();
        self.hits = 0;
        self.misses = 0;
        info!("Resolution cache cleared");
    }

    fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }
}
