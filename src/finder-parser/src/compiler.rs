//! Schema-bound compiler with a cache of compiled expressions

use std::num::NonZeroUsize;
use std::sync::Arc;

use finder_schema::PropertySource;
use lru::LruCache;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::expression::FinderExpression;

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Compiler settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// How many relations a property path may cross (0 disables nesting)
    pub max_relation_depth: usize,
    /// Number of compiled expressions kept by [`FinderCompiler`]
    pub cache_capacity: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_relation_depth: 4,
            cache_capacity: DEFAULT_CACHE_CAPACITY.get(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: usize,
    /// Lookups that compiled a new expression
    pub misses: usize,
    /// Expressions currently cached
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Compiles expressions against one schema snapshot.
///
/// Compiled expressions are cached by entity and text. Swapping the snapshot
/// with [`FinderCompiler::refresh`] drops every cached expression, since they
/// were resolved against the old properties.
pub struct FinderCompiler<S: PropertySource> {
    source: S,
    config: CompilerConfig,
    cache: LruCache<(String, String), Arc<FinderExpression>>,
    cache_hits: usize,
    cache_misses: usize,
}

impl<S: PropertySource> FinderCompiler<S> {
    /// Create a compiler with default settings
    pub fn new(source: S) -> Self {
        Self::with_config(source, CompilerConfig::default())
    }

    /// Create a compiler with explicit settings
    pub fn with_config(source: S, config: CompilerConfig) -> Self {
        let capacity = NonZeroUsize::new(config.cache_capacity).unwrap_or(DEFAULT_CACHE_CAPACITY);
        Self {
            source,
            config,
            cache: LruCache::new(capacity),
            cache_hits: 0,
            cache_misses: 0,
        }
    }

    /// Compile `text` for `entity`, reusing a cached result when possible
    pub fn compile(&mut self, text: &str, entity: &str) -> Result<Arc<FinderExpression>> {
        let key = (entity.to_string(), text.to_string());
        if let Some(cached) = self.cache.get(&key) {
            self.cache_hits += 1;
            log::debug!("cache hit for '{text}' on {entity}");
            return Ok(Arc::clone(cached));
        }

        self.cache_misses += 1;
        log::debug!("cache miss for '{text}' on {entity}");
        let compiled = Arc::new(FinderExpression::compile_with_config(
            text,
            entity,
            &self.source,
            &self.config,
        )?);
        self.cache.put(key, Arc::clone(&compiled));
        Ok(compiled)
    }

    /// Completion candidates for `text` on `entity`
    pub fn suggest(&mut self, text: &str, entity: &str) -> Result<Vec<String>> {
        Ok(self.compile(text, entity)?.suggest_next().to_vec())
    }

    /// Replace the schema snapshot and forget every cached expression
    pub fn refresh(&mut self, source: S) {
        self.source = source;
        self.clear_cache();
    }

    /// Drop all cached expressions
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Current cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.cache_hits,
            misses: self.cache_misses,
            entries: self.cache.len(),
        }
    }

    /// Compiler settings in use
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// The schema snapshot expressions are compiled against
    pub fn source(&self) -> &S {
        &self.source
    }
}
