#![allow(dead_code)]

use std::collections::BTreeMap;

use mapty_core::{KvStore, MapSurface, MemoryStore, StoreError};
use mapty_protocol::{Bounds, Coords, MarkerIcon};

/// A marker the fake map is currently showing.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnMarker {
    pub coords: Coords,
    pub icon: MarkerIcon,
    pub label: String,
}

/// Map surface that records every call.
#[derive(Debug, Default)]
pub struct FakeMap {
    next_handle: u64,
    pub live: BTreeMap<u64, DrawnMarker>,
    pub removed: Vec<u64>,
    pub fitted: Vec<Bounds>,
    pub panned: Vec<Coords>,
}

impl MapSurface for FakeMap {
    type Handle = u64;

    fn create_marker(&mut self, coords: Coords, icon: MarkerIcon, label: &str) -> u64 {
        self.next_handle += 1;
        self.live.insert(
            self.next_handle,
            DrawnMarker {
                coords,
                icon,
                label: label.to_string(),
            },
        );
        self.next_handle
    }

    fn remove_marker(&mut self, handle: u64) {
        assert!(self.live.remove(&handle).is_some(), "unknown marker {handle}");
        self.removed.push(handle);
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.fitted.push(bounds);
    }

    fn pan_to(&mut self, coords: Coords) {
        self.panned.push(coords);
    }
}

/// Memory store whose writes can be switched off to simulate a full or
/// unavailable backing store.
#[derive(Debug, Default)]
pub struct FlakyStore {
    pub inner: MemoryStore,
    pub fail_writes: bool,
}

impl KvStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".into()));
        }
        self.inner.set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("quota exceeded".into()));
        }
        self.inner.delete(key)
    }
}

/// Entries of the stored blob as JSON values.
pub fn stored_entries<S: KvStore>(store: &S) -> Vec<serde_json::Value> {
    match store.get("workouts").unwrap() {
        Some(bytes) => serde_json::from_slice::<Vec<serde_json::Value>>(&bytes).unwrap(),
        None => Vec::new(),
    }
}
