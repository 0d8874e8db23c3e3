use crate::clock::Clock;
use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

struct CacheEntry<V> {
    value: V,
    stored_at: DateTime<Utc>,
}

type Slot<V> = Arc<Mutex<Option<CacheEntry<V>>>>;

/// Keyed in-memory cache whose entries expire `ttl` after they were stored.
///
/// Each key owns an async lock that is held while its value is being fetched, so
/// concurrent callers for the same key wait for the first fetch instead of issuing
/// their own. Failed fetches leave nothing behind: the next call fetches again.
pub struct TtlCache<K, V> {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    slots: Mutex<HashMap<K, Slot<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone,
{
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value for `key` if it is still fresh, otherwise runs `fetch`
    /// and caches its `Ok` result.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(&key).await;
        let mut entry = slot.lock().await;

        if let Some(cached) = entry.as_ref() {
            if self.is_fresh(cached) {
                debug!("Cache hit for {:?}", key);
                return Ok(cached.value.clone());
            }
            debug!("Cache entry for {:?} expired", key);
            *entry = None;
        }

        match fetch().await {
            Ok(value) => {
                *entry = Some(CacheEntry {
                    value: value.clone(),
                    stored_at: self.clock.now(),
                });
                Ok(value)
            }
            Err(error) => {
                drop(entry);
                self.remove_if_vacant(&key, &slot).await;
                Err(error)
            }
        }
    }

    /// The fresh value for `key`, if any, without fetching.
    pub async fn get(&self, key: &K) -> Option<V> {
        let slot = {
            let slots = self.slots.lock().await;
            slots.get(key).cloned()
        }?;
        let entry = slot.lock().await;
        entry
            .as_ref()
            .filter(|cached| self.is_fresh(cached))
            .map(|cached| cached.value.clone())
    }

    pub async fn invalidate(&self, key: &K) {
        self.slots.lock().await.remove(key);
    }

    pub async fn clear(&self) {
        self.slots.lock().await.clear();
    }

    /// Number of keys currently holding a slot, fresh or not.
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Hands out the slot for `key`, first dropping every other slot that is expired or
    /// empty and not in use by another caller.
    async fn slot(&self, key: &K) -> Slot<V> {
        let mut slots = self.slots.lock().await;
        let now = self.clock.now();
        let before = slots.len();
        slots.retain(|slot_key, slot| {
            if slot_key == key || Arc::strong_count(slot) > 1 {
                return true;
            }
            match slot.try_lock() {
                Ok(entry) => entry
                    .as_ref()
                    .is_some_and(|cached| self.is_fresh_at(cached, now)),
                Err(_) => true,
            }
        });
        if slots.len() < before {
            debug!("Dropped {} stale cache slots", before - slots.len());
        }
        slots.entry(key.clone()).or_default().clone()
    }

    /// Removes the slot of a failed fetch unless another caller is waiting on it.
    async fn remove_if_vacant(&self, key: &K, slot: &Slot<V>) {
        let mut slots = self.slots.lock().await;
        let vacant = match slots.get(key) {
            // Held by the map and by `slot` only.
            Some(current) => Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2,
            None => false,
        };
        if vacant {
            slots.remove(key);
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        self.is_fresh_at(entry, self.clock.now())
    }

    fn is_fresh_at(&self, entry: &CacheEntry<V>, now: DateTime<Utc>) -> bool {
        match (now - entry.stored_at).to_std() {
            Ok(age) => age < self.ttl,
            // Clock moved backwards since the entry was stored.
            Err(_) => true,
        }
    }
}
