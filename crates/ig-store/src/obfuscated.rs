//! Reversible value encoding on top of a [`KeyValueStore`].
//!
//! Values are serialized to JSON and base64-encoded before storage. This is
//! obfuscation only: there is no key, so it gives no confidentiality. Do not
//! store credentials or session secrets here.
//!
//! Persistence is best-effort. Storage faults and undecodable entries are
//! logged and then treated as "nothing stored"; no method on
//! [`ObfuscatedStore`] returns an error.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::backend::KeyValueStore;

/// Why a value could not be encoded or decoded.
#[derive(Debug, Error)]
pub enum ObfuscationError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Decoded value is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Encode a value the way [`ObfuscatedStore::set`] stores it.
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, ObfuscationError> {
    let json = serde_json::to_string(value)?;
    Ok(STANDARD.encode(json))
}

/// Decode a stored string back into a value.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, ObfuscationError> {
    let bytes = STANDARD.decode(raw.trim())?;
    let json = String::from_utf8(bytes)?;
    Ok(serde_json::from_str(&json)?)
}

/// Wraps a backend so that everything written through it is obfuscated.
#[derive(Debug, Default)]
pub struct ObfuscatedStore<S> {
    backend: S,
}

impl<S: KeyValueStore> ObfuscatedStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Store `value` under `key`. Failures are logged and dropped.
    pub fn set<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let encoded = match encode(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to encode value, not stored");
                return;
            }
        };
        if let Err(e) = self.backend.set_item(key, &encoded) {
            warn!(key = %key, error = %e, "Failed to store value");
        }
    }

    /// Read the value under `key`.
    ///
    /// Returns `None` when nothing is stored, when the backend fails, or when
    /// the stored string does not decode to a `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %key, "No stored value");
                return None;
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read stored value");
                return None;
            }
        };
        match decode(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key = %key, error = %e, "Stored value could not be decoded");
                None
            }
        }
    }

    /// Whether anything is stored under `key`, decodable or not.
    pub fn contains(&self, key: &str) -> bool {
        matches!(self.backend.get_item(key), Ok(Some(_)))
    }

    pub fn remove(&mut self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            warn!(key = %key, error = %e, "Failed to remove stored value");
        }
    }

    pub fn clear(&mut self) {
        if let Err(e) = self.backend.clear() {
            warn!(error = %e, "Failed to clear store");
        }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    pub fn into_inner(self) -> S {
        self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StoreError;
    use crate::memory::MemoryStore;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        font_size: u8,
    }

    /// A backend whose every operation fails.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get_item(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
        fn remove_item(&mut self, _key: &str) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
        fn clear(&mut self) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("quota exceeded".into()))
        }
    }

    #[test]
    fn test_set_and_get() {
        let mut store = ObfuscatedStore::new(MemoryStore::new());
        let prefs = Prefs {
            theme: "dark".into(),
            font_size: 14,
        };
        store.set("prefs", &prefs);
        assert_eq!(store.get::<Prefs>("prefs"), Some(prefs));
    }

    #[test]
    fn test_value_is_not_stored_in_plain_text() {
        let mut store = ObfuscatedStore::new(MemoryStore::new());
        store.set("greeting", "hello");

        let raw = store.backend().get_item("greeting").unwrap().unwrap();
        assert_eq!(raw, STANDARD.encode("\"hello\""));
        assert!(!raw.contains("hello"));
    }

    #[test]
    fn test_missing_key() {
        let store = ObfuscatedStore::new(MemoryStore::new());
        assert_eq!(store.get::<String>("absent"), None);
        assert!(!store.contains("absent"));
    }

    #[test]
    fn test_corrupt_entries_read_as_none() {
        let mut store = ObfuscatedStore::new(MemoryStore::new());
        store.backend_mut().set_item("not-base64", "%%%").unwrap();
        store.backend_mut().set_item("not-json", &STANDARD.encode("{oops")).unwrap();
        store
            .backend_mut()
            .set_item("not-utf8", &STANDARD.encode([0xff, 0xfe]))
            .unwrap();

        assert_eq!(store.get::<serde_json::Value>("not-base64"), None);
        assert_eq!(store.get::<serde_json::Value>("not-json"), None);
        assert_eq!(store.get::<serde_json::Value>("not-utf8"), None);
        assert!(store.contains("not-json"));
    }

    #[test]
    fn test_wrong_type_reads_as_none() {
        let mut store = ObfuscatedStore::new(MemoryStore::new());
        store.set("count", &42);
        assert_eq!(store.get::<Prefs>("count"), None);
        assert_eq!(store.get::<u32>("count"), Some(42));
    }

    #[test]
    fn test_remove_and_clear() {
        let mut store = ObfuscatedStore::new(MemoryStore::new());
        store.set("a", &1);
        store.set("b", &2);

        store.remove("a");
        assert_eq!(store.get::<i32>("a"), None);
        assert_eq!(store.get::<i32>("b"), Some(2));

        store.clear();
        assert!(store.into_inner().is_empty());
    }

    #[test]
    fn test_backend_failures_are_swallowed() {
        let mut store = ObfuscatedStore::new(BrokenStore);
        store.set("k", &BTreeMap::from([("a", 1)]));
        assert_eq!(store.get::<i32>("k"), None);
        assert!(!store.contains("k"));
        store.remove("k");
        store.clear();
    }

    #[test]
    fn test_unserializable_value_is_not_stored() {
        // JSON object keys must be strings.
        let value: BTreeMap<(u8, u8), u8> = BTreeMap::from([((1, 2), 3)]);
        let mut store = ObfuscatedStore::new(MemoryStore::new());
        store.set("bad", &value);
        assert!(!store.contains("bad"));
    }

    #[test]
    fn test_encode_decode_unicode() {
        let encoded = encode("caf\u{e9} \u{1f409}").unwrap();
        let decoded: String = decode(&encoded).unwrap();
        assert_eq!(decoded, "caf\u{e9} \u{1f409}");
    }
}
