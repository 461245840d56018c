//! Integrator-defined menu keys.
//!
//! Service-window menus send their configured key as `ActionParam` on click.
//! Apart from the platform-reserved actions (`authentication`, `delete`) the
//! keys are chosen by the integrator, who binds each one to a handler name.
//!
//! The router consults the table through [`MenuLookup`], so any mapping can be
//! injected. [`MenuRegistry`] is the shared, thread-safe implementation: clones
//! share one table and keys registered through any clone are visible to
//! routers holding another.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::constants::RESERVED_ACTIONS;
use crate::error::{MenuError, MenuResult};

/// Resolves a menu key to the name of the handler bound to it.
pub trait MenuLookup: Send + Sync {
    /// Returns the handler name for `key`, or `None` if the key is unmapped.
    fn resolve(&self, key: &str) -> Option<String>;
}

impl MenuLookup for HashMap<String, String> {
    fn resolve(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

impl MenuLookup for BTreeMap<String, String> {
    fn resolve(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Returns `true` if `key` is reserved by the platform.
pub fn is_reserved(key: &str) -> bool {
    RESERVED_ACTIONS.contains(&key)
}

/// Shared menu key table.
#[derive(Clone, Default)]
pub struct MenuRegistry {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MenuRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `key` as bound to `handler`, replacing any previous binding.
    ///
    /// Returns the handler previously bound to the key.
    pub fn register(
        &self,
        key: impl Into<String>,
        handler: impl Into<String>,
    ) -> MenuResult<Option<String>> {
        let key = key.into();
        let handler = handler.into();

        if key.is_empty() {
            return Err(MenuError::EmptyKey);
        }
        if is_reserved(&key) {
            return Err(MenuError::Reserved(key));
        }
        if handler.is_empty() {
            return Err(MenuError::EmptyHandler { key });
        }

        debug!(key = %key, handler = %handler, "Registered menu key");
        Ok(self.entries.write().insert(key, handler))
    }

    /// Registers `key` (builder pattern).
    pub fn with(self, key: impl Into<String>, handler: impl Into<String>) -> MenuResult<Self> {
        self.register(key, handler)?;
        Ok(self)
    }

    /// Removes `key`, returning the handler it was bound to.
    pub fn unregister(&self, key: &str) -> Option<String> {
        let removed = self.entries.write().remove(key);
        if removed.is_some() {
            debug!(key = %key, "Unregistered menu key");
        }
        removed
    }

    /// Returns `true` if `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.read().contains_key(key)
    }

    /// Returns the number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns `true` if no keys are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns all registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.read().keys().cloned().collect();
        keys.sort_unstable();
        keys
    }
}

impl MenuLookup for MenuRegistry {
    fn resolve(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }
}

impl std::fmt::Debug for MenuRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_register_and_resolve() {
        let menus = MenuRegistry::new();
        assert_eq!(menus.register("async_image_text", "async_msg_send"), Ok(None));
        assert_eq!(
            menus.resolve("async_image_text").as_deref(),
            Some("async_msg_send")
        );
        assert_eq!(menus.resolve("other"), None);
        assert_eq!(
            menus.register("async_image_text", "other_handler"),
            Ok(Some("async_msg_send".to_string()))
        );
    }

    #[test]
    fn test_rejects_reserved_and_empty() {
        let menus = MenuRegistry::new();
        assert_eq!(
            menus.register("authentication", "h"),
            Err(MenuError::Reserved("authentication".into()))
        );
        assert_eq!(
            menus.register("delete", "h"),
            Err(MenuError::Reserved("delete".into()))
        );
        assert_eq!(menus.register("", "h"), Err(MenuError::EmptyKey));
        assert_eq!(
            menus.register("k", ""),
            Err(MenuError::EmptyHandler { key: "k".into() })
        );
        assert!(menus.is_empty());
    }

    #[test]
    fn test_clones_share_entries() {
        let menus = MenuRegistry::new();
        let other = menus.clone();
        other.register("k", "h").unwrap();
        assert!(menus.contains("k"));
        assert_eq!(menus.unregister("k").as_deref(), Some("h"));
        assert!(other.is_empty());
    }

    #[test]
    fn test_concurrent_registration() {
        let menus = MenuRegistry::new();
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let menus = menus.clone();
                thread::spawn(move || {
                    menus.register(format!("key_{i}"), "handler").unwrap();
                    menus.resolve(&format!("key_{i}"))
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_deref(), Some("handler"));
        }
        assert_eq!(menus.len(), 8);
        assert_eq!(menus.keys()[0], "key_0");
    }

    #[test]
    fn test_hash_map_lookup() {
        let mut map = HashMap::new();
        map.insert("k".to_string(), "h".to_string());
        assert_eq!(map.resolve("k").as_deref(), Some("h"));
    }
}
