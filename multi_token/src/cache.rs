use std::collections::HashMap;
use std::sync::Mutex;

use log::{trace, warn};
use primitive_types::U256;

use crate::error::{MultiTokenError, MultiTokenResult};
use crate::storage::BalanceStorage;
use crate::types::Address;

/// Persistent backend holding committed bins
pub trait BinStorageProvider: Sync {
    fn load_bin(&self, owner: &Address, bin: &U256) -> Result<Option<U256>, anyhow::Error>;
}

/// Where a cached bin came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinState {
    /// Loaded from the provider (absent bins as zero), unchanged
    Fetched,
    /// Written during execution, must be flushed
    Dirty,
}

#[derive(Debug, Clone, Default)]
pub struct BinCache {
    bins: HashMap<(Address, U256), (BinState, U256)>,
}

impl BinCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bins written since the cache was created, ready to be persisted
    pub fn dirty_entries(&self) -> Vec<(Address, U256, U256)> {
        let mut entries: Vec<_> = self
            .bins
            .iter()
            .filter(|(_, (state, _))| *state == BinState::Dirty)
            .map(|((owner, bin), (_, value))| (*owner, *bin, *value))
            .collect();
        entries.sort();
        entries
    }

    /// Number of cached bins, fetched or dirty
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn clear(&mut self) {
        self.bins.clear();
    }
}

/// Read-through, write-back bin storage over a provider
pub struct BinCacheStorage<'a> {
    provider: &'a (dyn BinStorageProvider + Sync),
    cache: Mutex<&'a mut BinCache>,
}

impl<'a> BinCacheStorage<'a> {
    pub fn new(provider: &'a (dyn BinStorageProvider + Sync), cache: &'a mut BinCache) -> Self {
        Self {
            provider,
            cache: Mutex::new(cache),
        }
    }

    fn with_cache<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut BinCache) -> R,
    {
        let mut cache_ref = match self.cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(*cache_ref)
    }

    fn map_err(err: anyhow::Error) -> MultiTokenError {
        warn!("bin provider failure: {:#}", err);
        MultiTokenError::StorageError
    }

    fn get_cached_bin(&self, key: &(Address, U256)) -> Option<U256> {
        self.with_cache(|cache| cache.bins.get(key).map(|(_, value)| *value))
    }
}

impl BalanceStorage for BinCacheStorage<'_> {
    // Query path only: an unreadable bin shows as zero and is not cached
    fn get_bin(&self, owner: &Address, bin: &U256) -> U256 {
        self.try_get_bin(owner, bin).unwrap_or_default()
    }

    fn try_get_bin(&self, owner: &Address, bin: &U256) -> MultiTokenResult<U256> {
        let key = (*owner, *bin);
        if let Some(value) = self.get_cached_bin(&key) {
            return Ok(value);
        }

        let value = self
            .provider
            .load_bin(owner, bin)
            .map_err(Self::map_err)?
            .unwrap_or_default();
        if log::log_enabled!(log::Level::Trace) {
            trace!("fetched bin {} of {} from provider", bin, owner);
        }
        self.with_cache(|cache| {
            cache.bins.insert(key, (BinState::Fetched, value));
        });
        Ok(value)
    }

    fn set_bin(&mut self, owner: &Address, bin: &U256, value: U256) -> MultiTokenResult<()> {
        self.with_cache(|cache| {
            cache.bins.insert((*owner, *bin), (BinState::Dirty, value));
        });
        Ok(())
    }
}
