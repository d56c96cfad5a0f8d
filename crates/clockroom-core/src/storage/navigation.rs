//! Navigation-scoped handoffs: data that survives a page change but not
//! the end of the session.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::KvStore;

const FULLSCREEN_INTENT_KEY: &str = "clock-fullscreen-intent";
const WEATHER_CACHE_KEY: &str = "clock-weather-cache";

/// 4 hours.
pub const WEATHER_TTL_MS: u64 = 4 * 60 * 60 * 1000;

/// One-shot "enter fullscreen on the next page" message.
///
/// Written by the page being left, drained by the page being mounted.
pub struct FullscreenIntent;

impl FullscreenIntent {
    pub fn post(store: &mut dyn KvStore) {
        if let Err(e) = store.set(FULLSCREEN_INTENT_KEY, "true") {
            warn!(error = %e, "could not record fullscreen intent");
        }
    }

    /// Read and clear. Returns `true` at most once per `post`.
    pub fn take(store: &mut dyn KvStore) -> bool {
        let pending = Self::peek(store);
        if pending {
            if let Err(e) = store.remove(FULLSCREEN_INTENT_KEY) {
                warn!(error = %e, "could not clear fullscreen intent");
            }
            debug!("fullscreen intent consumed");
        }
        pending
    }

    pub fn peek(store: &dyn KvStore) -> bool {
        matches!(store.get(FULLSCREEN_INTENT_KEY), Ok(Some(v)) if v == "true")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCacheEntry<T> {
    pub data: T,
    /// Epoch milliseconds of the write.
    pub timestamp: u64,
}

/// Time-boxed weather cache in navigation-scoped storage.
pub struct WeatherCache<T> {
    ttl_ms: u64,
    _data: PhantomData<T>,
}

impl<T> Default for WeatherCache<T>
where
    T: Serialize + DeserializeOwned,
{
    fn default() -> Self {
        Self::new(WEATHER_TTL_MS)
    }
}

impl<T> WeatherCache<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(ttl_ms: u64) -> Self {
        Self {
            ttl_ms,
            _data: PhantomData,
        }
    }

    pub fn put(&self, store: &mut dyn KvStore, data: T, now_ms: u64) {
        let entry = WeatherCacheEntry {
            data,
            timestamp: now_ms,
        };
        match serde_json::to_string(&entry) {
            Ok(json) => {
                if let Err(e) = store.set(WEATHER_CACHE_KEY, &json) {
                    warn!(error = %e, "weather cache write dropped");
                }
            }
            Err(e) => warn!(error = %e, "weather cache entry not serializable"),
        }
    }

    /// Fresh data or `None`. Expired and corrupt entries are evicted.
    pub fn get(&self, store: &mut dyn KvStore, now_ms: u64) -> Option<T> {
        let raw = match store.get(WEATHER_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "weather cache read failed");
                return None;
            }
        };
        let entry: WeatherCacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "evicting corrupt weather cache");
                let _ = store.remove(WEATHER_CACHE_KEY);
                return None;
            }
        };
        if now_ms.saturating_sub(entry.timestamp) > self.ttl_ms {
            debug!("weather cache expired");
            let _ = store.remove(WEATHER_CACHE_KEY);
            return None;
        }
        Some(entry.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKv;

    const MINUTE: u64 = 60 * 1000;
    const HOUR: u64 = 60 * MINUTE;

    #[test]
    fn intent_is_consumed_once() {
        let mut store = MemoryKv::new();
        assert!(!FullscreenIntent::take(&mut store));
        FullscreenIntent::post(&mut store);
        assert!(FullscreenIntent::peek(&store));
        assert!(FullscreenIntent::take(&mut store));
        assert!(!FullscreenIntent::take(&mut store));
    }

    #[test]
    fn weather_entry_expires_after_four_hours() {
        let mut store = MemoryKv::new();
        let cache = WeatherCache::<String>::default();
        let t = 1_700_000_000_000;
        cache.put(&mut store, "sunny".to_string(), t);

        assert_eq!(
            cache.get(&mut store, t + 3 * HOUR + 59 * MINUTE).as_deref(),
            Some("sunny")
        );
        assert_eq!(cache.get(&mut store, t + 4 * HOUR + MINUTE), None);
        assert!(store.is_empty());
    }

    #[test]
    fn corrupt_weather_entry_is_evicted() {
        let mut store = MemoryKv::new();
        store.set(WEATHER_CACHE_KEY, "[1,2").unwrap();
        let cache = WeatherCache::<String>::default();
        assert_eq!(cache.get(&mut store, 0), None);
        assert!(store.is_empty());
    }
}
