// crates/clusterview-core/src/runtime/cache.rs
// ============================================================================
// Module: Resolved Value Cache
// Description: Shared cache of resolved option values keyed by config key.
// Purpose: Avoid repeated attribute queries within a session.
// Dependencies: serde, std::sync
// ============================================================================

//! ## Overview
//! [`ValueCache`] is constructed explicitly by the caller and handed to the
//! resolver. Clones share the same map, so one cache can serve every request
//! thread of a process. Entries stay valid until invalidated; attribute
//! updates invalidate their key. [`CacheMode::Disabled`] keeps nothing and
//! makes every lookup query the cluster.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Cache Mode
// ============================================================================

/// Retention policy for resolved values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Keep values until invalidated.
    #[default]
    Session,
    /// Keep nothing; every lookup re-queries.
    Disabled,
}

// ============================================================================
// SECTION: Value Cache
// ============================================================================

/// Thread-safe cache of resolved values.
#[derive(Debug, Clone, Default)]
pub struct ValueCache {
    /// Retention policy.
    mode: CacheMode,
    /// Values keyed by configuration key.
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl ValueCache {
    /// Creates an empty cache with the given mode.
    #[must_use]
    pub fn new(mode: CacheMode) -> Self {
        Self {
            mode,
            entries: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Returns the retention policy.
    #[must_use]
    pub const fn mode(&self) -> CacheMode {
        self.mode
    }

    /// Returns the cached value for a key.
    #[must_use]
    pub fn get(&self, config_key: &str) -> Option<String> {
        self.lock().get(config_key).cloned()
    }

    /// Stores a value; a no-op when caching is disabled.
    pub fn insert(&self, config_key: &str, value: &str) {
        if self.mode == CacheMode::Disabled {
            return;
        }
        self.lock().insert(config_key.to_string(), value.to_string());
    }

    /// Removes a single key and returns true when it was present.
    pub fn invalidate(&self, config_key: &str) -> bool {
        self.lock().remove(config_key).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Locks the map, recovering the data if a writer panicked.
    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
