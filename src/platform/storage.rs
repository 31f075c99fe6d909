//! String key-value storage backends
//!
//! The save system only ever needs get/set/remove plus key enumeration, the
//! same surface the browser's `localStorage` offers. Anything implementing
//! [`KeyValueStore`] can back it.

use std::collections::BTreeMap;
use std::fmt;

/// Failure reported by a storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend refused the write because it is full
    QuotaExceeded,
    /// No storage is available (private browsing, no window, ...)
    Unavailable,
    /// Any other backend failure, with its description
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::QuotaExceeded => write!(f, "storage quota exceeded"),
            StoreError::Unavailable => write!(f, "storage unavailable"),
            StoreError::Backend(msg) => write!(f, "storage backend error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Minimal persistent string store
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if missing
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`; removing a missing key is not an error
    fn remove_item(&mut self, key: &str) -> Result<(), StoreError>;

    /// Every key currently present, in backend order
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// In-memory store used natively and in tests
///
/// An optional byte quota (key + value lengths) emulates the browser's
/// quota-exceeded behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store that rejects writes past `bytes`
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            items: BTreeMap::new(),
            quota: Some(bytes),
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bytes currently used (key + value, UTF-8)
    pub fn used_bytes(&self) -> usize {
        self.items.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let replaced = self.items.get(key).map(|old| key.len() + old.len()).unwrap_or(0);
            let projected = self.used_bytes() - replaced + key.len() + value.len();
            if projected > quota {
                return Err(StoreError::QuotaExceeded);
            }
        }
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.items.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.items.keys().cloned().collect())
    }
}

/// Browser `localStorage` (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's localStorage, `Unavailable` if the page has none
    pub fn open() -> Result<Self, StoreError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)?;
        Ok(Self { storage })
    }

    fn map_err(err: wasm_bindgen::JsValue) -> StoreError {
        use wasm_bindgen::JsCast;

        if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
            let name = dom.name();
            // Firefox reports its own name for the same condition
            if name == "QuotaExceededError" || name == "NS_ERROR_DOM_QUOTA_REACHED" {
                return StoreError::QuotaExceeded;
            }
            return StoreError::Backend(format!("{}: {}", name, dom.message()));
        }
        StoreError::Backend(format!("{:?}", err))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage.get_item(key).map_err(Self::map_err)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage.set_item(key, value).map_err(Self::map_err)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage.remove_item(key).map_err(Self::map_err)
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let len = self.storage.length().map_err(Self::map_err)?;
        let mut keys = Vec::with_capacity(len as usize);
        for i in 0..len {
            if let Some(key) = self.storage.key(i).map_err(Self::map_err)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}
