//! Short-lived, bounded cache in front of a geocoder.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use luckymap_core::{GeoPoint, Geocoder, Place, normalise_query};
use parking_lot::Mutex;

/// How long a cached answer stays fresh.
pub const CACHE_TTL: Duration = Duration::from_secs(30);

/// Maximum number of cached answers.
pub const CACHE_CAPACITY: usize = 1024;

#[derive(Debug)]
struct Entry<V> {
    value: V,
    inserted: Instant,
}

/// Thread-safe map whose entries expire after a fixed window.
///
/// When full, inserting purges every stale entry and, if that frees nothing,
/// evicts the oldest one.
#[derive(Debug)]
pub struct GeocodeCache<V> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    ttl: Duration,
    capacity: usize,
}

impl<V> Default for GeocodeCache<V> {
    fn default() -> Self {
        Self::new(CACHE_TTL, CACHE_CAPACITY)
    }
}

impl<V> GeocodeCache<V> {
    /// Create a cache with the given staleness window and size cap.
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Staleness window.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of entries held, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    fn is_fresh(&self, inserted: Instant, now: Instant) -> bool {
        now.saturating_duration_since(inserted) < self.ttl
    }
}

impl<V: Clone> GeocodeCache<V> {
    /// Fresh value for `key` as of now.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Fresh value for `key` as of `now`.
    #[must_use]
    pub fn get_at(&self, key: &str, now: Instant) -> Option<V> {
        let entries = self.entries.lock();
        entries
            .get(key)
            .filter(|entry| self.is_fresh(entry.inserted, now))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, stamped now.
    pub fn insert(&self, key: String, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    /// Store `value` under `key`, stamped `now`.
    pub fn insert_at(&self, key: String, value: V, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.lock();
        if !entries.contains_key(&key) && entries.len() >= self.capacity {
            entries.retain(|_, entry| self.is_fresh(entry.inserted, now));
            if entries.len() >= self.capacity {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.inserted)
                    .map(|(oldest_key, _)| oldest_key.clone());
                if let Some(oldest_key) = oldest {
                    entries.remove(&oldest_key);
                }
            }
        }
        entries.insert(
            key,
            Entry {
                value,
                inserted: now,
            },
        );
    }
}

#[derive(Debug, Clone)]
enum Answer {
    Places(Vec<Place>),
    Address(Option<String>),
}

fn search_key(query: &str) -> String {
    format!("search:{}", query.to_lowercase())
}

fn reverse_key(point: GeoPoint) -> String {
    format!("reverse:{},{}", point.lat, point.lng)
}

/// Geocoder wrapper that caches answers and never fails.
///
/// Provider errors are logged and reported as "no result"; they are not
/// cached, so the next lookup retries.
#[derive(Debug)]
pub struct CachedGeocoder<G> {
    inner: G,
    cache: GeocodeCache<Answer>,
}

impl<G: Geocoder> CachedGeocoder<G> {
    /// Wrap `inner` with the default staleness window and size cap.
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: GeocodeCache::default(),
        }
    }

    /// Wrap `inner` with an explicit staleness window and size cap.
    #[must_use]
    pub fn with_limits(inner: G, ttl: Duration, capacity: usize) -> Self {
        Self {
            inner,
            cache: GeocodeCache::new(ttl, capacity),
        }
    }

    /// Wrapped geocoder.
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    /// Places matching `query`.
    ///
    /// Queries shorter than three characters after trimming return an empty
    /// list without contacting the geocoder.
    pub async fn search(&self, query: &str) -> Vec<Place> {
        let Some(trimmed) = normalise_query(query) else {
            return Vec::new();
        };
        let key = search_key(trimmed);
        if let Some(Answer::Places(places)) = self.cache.get(&key) {
            log::debug!("geocode cache hit for {key}");
            return places;
        }
        match self.inner.search(trimmed).await {
            Ok(places) => {
                self.cache.insert(key, Answer::Places(places.clone()));
                places
            }
            Err(err) => {
                log::warn!("place search for {trimmed:?} failed: {err}");
                Vec::new()
            }
        }
    }

    /// Address of the place at `point`, if any.
    pub async fn reverse(&self, point: GeoPoint) -> Option<String> {
        let key = reverse_key(point);
        if let Some(Answer::Address(address)) = self.cache.get(&key) {
            log::debug!("geocode cache hit for {key}");
            return address;
        }
        match self.inner.reverse(point).await {
            Ok(address) => {
                self.cache.insert(key, Answer::Address(address.clone()));
                address
            }
            Err(err) => {
                log::warn!("reverse geocoding of {},{} failed: {err}", point.lat, point.lng);
                None
            }
        }
    }
}
