//! Named cache of frozen templates
//!
//! Freezing a node tree is the expensive step; rendering a frozen template is
//! a single pass over its literal buffer. [`TemplateCache`] keeps frozen
//! templates by name so each tree is frozen once and rendered many times,
//! possibly from many threads.

use std::hash::Hash;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use log::{debug, trace};

use crate::error::Result;
use crate::template::Template;

/// Cache entry with expiration support
#[derive(Debug)]
struct CacheEntry<K> {
    template: Arc<Template<K>>,
    expires_at: Option<Instant>,
}

impl<K> CacheEntry<K> {
    fn new(template: Arc<Template<K>>, ttl: Option<Duration>) -> Self {
        Self {
            template,
            expires_at: ttl.map(|duration| Instant::now() + duration),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }
}

/// Which entry to drop when the cache is full
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionStrategy {
    /// Least recently used
    Lru,
    /// First in, first out
    Fifo,
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl: Option<Duration>,
    pub eviction_strategy: EvictionStrategy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 128,
            ttl: None,
            eviction_strategy: EvictionStrategy::Lru,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub hit_rate: f64,
    pub entry_count: usize,
    pub max_entries: usize,
}

struct CacheState<N, K> {
    // Front is the next eviction candidate: oldest insert for FIFO, least
    // recent access for LRU.
    entries: IndexMap<N, CacheEntry<K>>,
    hits: usize,
    misses: usize,
}

/// Thread-safe store of frozen templates, keyed by name
pub struct TemplateCache<N, K> {
    state: RwLock<CacheState<N, K>>,
    config: CacheConfig,
}

impl<N, K> TemplateCache<N, K>
where
    N: Hash + Eq + Clone + std::fmt::Debug,
{
    /// Create a new template cache with default settings
    pub fn new() -> Self {
        Self::with_config(CacheConfig::default())
    }

    /// Create a new template cache with custom configuration
    pub fn with_config(config: CacheConfig) -> Self {
        Self {
            state: RwLock::new(CacheState {
                entries: IndexMap::new(),
                hits: 0,
                misses: 0,
            }),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Look up a template, counting a hit or a miss
    pub fn get(&self, name: &N) -> Option<Arc<Template<K>>> {
        let Ok(mut state) = self.state.write() else {
            return None;
        };
        let now = Instant::now();

        let Some(index) = state.entries.get_index_of(name) else {
            state.misses += 1;
            trace!("template cache miss: {:?}", name);
            return None;
        };
        if state.entries[index].is_expired(now) {
            state.entries.shift_remove_index(index);
            state.misses += 1;
            debug!("template cache entry expired: {:?}", name);
            return None;
        }

        if self.config.eviction_strategy == EvictionStrategy::Lru {
            let last = state.entries.len() - 1;
            state.entries.move_index(index, last);
        }
        state.hits += 1;
        trace!("template cache hit: {:?}", name);
        state.entries.get(name).map(|entry| Arc::clone(&entry.template))
    }

    /// Store a template, returning the one it replaced
    pub fn insert(&self, name: N, template: Template<K>) -> Option<Arc<Template<K>>> {
        self.insert_shared(name, Arc::new(template))
    }

    /// Store an already shared template, returning the one it replaced
    pub fn insert_shared(&self, name: N, template: Arc<Template<K>>) -> Option<Arc<Template<K>>> {
        let Ok(mut state) = self.state.write() else {
            return None;
        };
        let now = Instant::now();
        state.entries.retain(|_, entry| !entry.is_expired(now));

        let replaced = state
            .entries
            .shift_remove(&name)
            .map(|entry| entry.template);
        while self.config.max_entries > 0 && state.entries.len() >= self.config.max_entries {
            if let Some((evicted, _)) = state.entries.shift_remove_index(0) {
                debug!("template cache evicted: {:?}", evicted);
            }
        }
        if self.config.max_entries > 0 {
            state
                .entries
                .insert(name, CacheEntry::new(template, self.config.ttl));
        }
        replaced
    }

    /// Return the cached template, or freeze one with `freeze` and cache it
    ///
    /// Errors from `freeze` are returned and nothing is cached.
    pub fn get_or_freeze<F>(&self, name: &N, freeze: F) -> Result<Arc<Template<K>>>
    where
        F: FnOnce() -> Result<Template<K>>,
    {
        if let Some(template) = self.get(name) {
            return Ok(template);
        }

        let template = Arc::new(freeze()?);
        self.insert_shared(name.clone(), Arc::clone(&template));
        Ok(template)
    }

    /// Remove a specific template from the cache
    pub fn remove(&self, name: &N) -> Option<Arc<Template<K>>> {
        let mut state = self.state.write().ok()?;
        state.entries.shift_remove(name).map(|entry| entry.template)
    }

    /// Clear all entries and statistics
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            state.entries.clear();
            state.hits = 0;
            state.misses = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().map(|state| state.entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        self.state
            .read()
            .map(|state| {
                let requests = state.hits + state.misses;
                CacheStats {
                    hits: state.hits,
                    misses: state.misses,
                    hit_rate: if requests > 0 {
                        state.hits as f64 / requests as f64
                    } else {
                        0.0
                    },
                    entry_count: state.entries.len(),
                    max_entries: self.config.max_entries,
                }
            })
            .unwrap_or_default()
    }
}

impl<N, K> Default for TemplateCache<N, K>
where
    N: Hash + Eq + Clone + std::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}
