//! Caller-owned device-status cache.
//!
//! Status reads are cheap but frequent (every poll of the floor map hits
//! every device), so callers may put this cache in front of
//! `compute_status`. It is an explicit value the caller constructs, owns
//! and injects; the engine itself never caches. Entries expire after a TTL
//! and can be invalidated eagerly when a write path changes the answer
//! (check-in, approval, expiry sweep).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::models::reservation::{DeviceId, DeviceStatus};

/// TTL cache of computed device statuses.
pub struct StatusCache {
    ttl: Duration,
    entries: RwLock<HashMap<DeviceId, CacheEntry>>,
}

struct CacheEntry {
    status: DeviceStatus,
    stored_at: Instant,
}

impl StatusCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Build from venue configuration.
    pub fn from_config(config: &crate::config::CacheSettings) -> Self {
        Self::new(Duration::from_secs(config.status_ttl_secs))
    }

    /// Fresh cached status for a device, if any.
    pub fn get(&self, device_id: DeviceId) -> Option<DeviceStatus> {
        let entries = self.entries.read();
        let entry = entries.get(&device_id)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        Some(entry.status)
    }

    /// Record a freshly computed status.
    pub fn insert(&self, device_id: DeviceId, status: DeviceStatus) {
        self.entries.write().insert(
            device_id,
            CacheEntry {
                status,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop one device's entry; the next read recomputes.
    pub fn invalidate(&self, device_id: DeviceId) {
        self.entries.write().remove(&device_id);
    }

    /// Drop everything (e.g. after a bulk import or a config change).
    pub fn invalidate_all(&self) {
        self.entries.write().clear();
    }

    /// Cached status or the result of `compute`, caching it on the way out.
    pub fn get_or_compute<F>(&self, device_id: DeviceId, compute: F) -> DeviceStatus
    where
        F: FnOnce() -> DeviceStatus,
    {
        if let Some(status) = self.get(device_id) {
            return status;
        }
        let status = compute();
        self.insert(device_id, status);
        status
    }
}
