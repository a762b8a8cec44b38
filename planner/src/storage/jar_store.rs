use piggy_jar_model::Address;
use serde::{de::DeserializeOwned, Serialize};

use crate::{billing::SimulatedClock, jar::model::Jar, notification::NotificationQueue, storage::KeyValueStorage};

/// Serializes planner state into a `KeyValueStorage`.
///
/// Reads never fail: missing, unreadable or corrupt entries come back as empty state.
/// Write failures are logged and dropped.
pub struct JarStore {
    storage: Box<dyn KeyValueStorage>,
    prefix: String,
}

impl JarStore {
    pub fn new(storage: Box<dyn KeyValueStorage>, prefix: &str) -> Self {
        Self {
            storage,
            prefix: prefix.to_owned(),
        }
    }

    /// Jars persisted for `identity`, in stored order.
    pub fn load(&self, identity: &str) -> Vec<Jar> {
        let Some(key) = self.jars_key(identity) else {
            return vec![];
        };

        self.read(&key).unwrap_or_default()
    }

    /// Replaces the jars persisted for `identity`. Malformed identities are ignored.
    pub fn save(&mut self, identity: &str, jars: &[Jar]) {
        let Some(key) = self.jars_key(identity) else {
            tracing::debug!("Skipping jar save for malformed identity {identity:?}");
            return;
        };

        self.write(&key, jars);
    }

    /// Removes the jars of `identity` together with the legacy unscoped jar list.
    pub fn clear(&mut self, identity: &str) {
        if let Some(key) = self.jars_key(identity) {
            self.remove(&key);
        }

        let legacy_key = self.legacy_jars_key();
        self.remove(&legacy_key);
    }

    pub(crate) fn load_clock(&self) -> SimulatedClock {
        self.read(&self.clock_key()).map(SimulatedClock::at).unwrap_or_default()
    }

    pub(crate) fn save_clock(&mut self, clock: &SimulatedClock) {
        let key = self.clock_key();
        self.write(&key, &clock.current_day());
    }

    pub(crate) fn load_notifications(&self) -> NotificationQueue {
        self.read(&self.notifications_key()).unwrap_or_default()
    }

    pub(crate) fn save_notifications(&mut self, notifications: &NotificationQueue) {
        let key = self.notifications_key();
        self.write(&key, notifications);
    }

    fn jars_key(&self, identity: &str) -> Option<String> {
        let address: Address = identity.parse().ok()?;
        Some(format!("{}:jars:{address}", self.prefix))
    }

    fn legacy_jars_key(&self) -> String {
        format!("{}:jars", self.prefix)
    }

    fn clock_key(&self) -> String {
        format!("{}:simDay", self.prefix)
    }

    fn notifications_key(&self) -> String {
        format!("{}:notifications", self.prefix)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.storage.get(key) {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!("Failed to read {key}: {err:#}");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!("Ignoring corrupt entry {key}: {err}");
                None
            }
        }
    }

    fn write<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("Failed to serialize {key}: {err}");
                return;
            }
        };

        if let Err(err) = self.storage.set(key, &raw) {
            tracing::warn!("Failed to write {key}: {err:#}");
        }
    }

    fn remove(&mut self, key: &str) {
        if let Err(err) = self.storage.remove(key) {
            tracing::warn!("Failed to remove {key}: {err:#}");
        }
    }
}
