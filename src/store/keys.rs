use crate::crypto::key_pair::KeyPair;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// One keyed record mapping. `set` with `None` removes the key; there are
/// no tombstones and no history, and a `get` miss is a value, not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordMap<K: Eq + Hash, V> {
    records: HashMap<K, V>,
}

impl<K: Eq + Hash, V> RecordMap<K, V> {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Eq + Hash + ?Sized,
    {
        self.records.get(key)
    }

    pub fn set(&mut self, key: K, value: Option<V>) {
        match value {
            Some(v) => {
                self.records.insert(key, v);
            }
            None => {
                self.records.remove(&key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate the backing records, for caller-side persistence.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.records.iter()
    }
}

impl<K: Eq + Hash, V> Default for RecordMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> FromIterator<(K, V)> for RecordMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// In-memory credential store: five independent mappings of cryptographic
/// material and protocol state. Session, sender-key and app-state records
/// are opaque blobs owned by their subsystems; this store only keeps them.
///
/// Intended for single-writer access per credential set instance; callers
/// serialize concurrent mutation externally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeyStore {
    pub pre_keys: RecordMap<u32, KeyPair>,
    pub sessions: RecordMap<String, Vec<u8>>,
    pub sender_keys: RecordMap<String, Vec<u8>>,
    pub app_state_sync_keys: RecordMap<String, Vec<u8>>,
    pub app_state_versions: RecordMap<String, Vec<u8>>,
}

impl KeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_pre_key(&self, key_id: u32) -> Option<&KeyPair> {
        self.pre_keys.get(&key_id)
    }

    pub fn set_pre_key(&mut self, key_id: u32, pair: Option<KeyPair>) {
        self.pre_keys.set(key_id, pair);
    }

    pub fn get_session(&self, id: &str) -> Option<&[u8]> {
        self.sessions.get(id).map(Vec::as_slice)
    }

    pub fn set_session(&mut self, id: &str, session: Option<Vec<u8>>) {
        self.sessions.set(id.to_string(), session);
    }

    pub fn get_sender_key(&self, id: &str) -> Option<&[u8]> {
        self.sender_keys.get(id).map(Vec::as_slice)
    }

    pub fn set_sender_key(&mut self, id: &str, key: Option<Vec<u8>>) {
        self.sender_keys.set(id.to_string(), key);
    }

    pub fn get_app_state_sync_key(&self, id: &str) -> Option<&[u8]> {
        self.app_state_sync_keys.get(id).map(Vec::as_slice)
    }

    pub fn set_app_state_sync_key(&mut self, id: &str, key: Option<Vec<u8>>) {
        self.app_state_sync_keys.set(id.to_string(), key);
    }

    pub fn get_app_state_version(&self, id: &str) -> Option<&[u8]> {
        self.app_state_versions.get(id).map(Vec::as_slice)
    }

    pub fn set_app_state_version(&mut self, id: &str, version: Option<Vec<u8>>) {
        self.app_state_versions.set(id.to_string(), version);
    }
}
