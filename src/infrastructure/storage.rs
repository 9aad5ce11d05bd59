//! Best-effort persistence of the global filter selection.
//!
//! Storage is optional: a missing or failing backend logs a warning and
//! behaves as empty.

use crate::domain::filters::PersistedFilters;
use crate::domain::logging::{LogComponent, get_logger};
use std::cell::RefCell;

pub trait FilterStore {
    fn load(&self) -> Option<PersistedFilters>;
    fn save(&self, filters: &PersistedFilters);
}

/// `window.localStorage` under a fixed key
pub struct LocalStorageFilterStore {
    key: String,
}

impl LocalStorageFilterStore {
    pub fn new(key: &str) -> Self {
        Self { key: key.to_string() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }
}

impl FilterStore for LocalStorageFilterStore {
    fn load(&self) -> Option<PersistedFilters> {
        let raw = Self::storage()?.get_item(&self.key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(filters) => Some(filters),
            Err(e) => {
                get_logger().warn(
                    LogComponent::Infrastructure("FilterStore"),
                    &format!("⚠️ Ignoring unreadable stored filters: {}", e),
                );
                None
            }
        }
    }

    fn save(&self, filters: &PersistedFilters) {
        let Some(storage) = Self::storage() else {
            get_logger().warn(LogComponent::Infrastructure("FilterStore"), "⚠️ localStorage unavailable");
            return;
        };
        let written = serde_json::to_string(filters)
            .map_err(|e| e.to_string())
            .and_then(|json| storage.set_item(&self.key, &json).map_err(|e| format!("{:?}", e)));
        if let Err(e) = written {
            get_logger().warn(
                LogComponent::Infrastructure("FilterStore"),
                &format!("⚠️ Failed to persist filters: {}", e),
            );
        }
    }
}

/// In-memory store for hosts without web storage
#[derive(Debug, Default)]
pub struct MemoryFilterStore {
    saved: RefCell<Option<PersistedFilters>>,
}

impl FilterStore for MemoryFilterStore {
    fn load(&self) -> Option<PersistedFilters> {
        self.saved.borrow().clone()
    }

    fn save(&self, filters: &PersistedFilters) {
        *self.saved.borrow_mut() = Some(filters.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_last_save() {
        let store = MemoryFilterStore::default();
        assert_eq!(store.load(), None);
        let filters = PersistedFilters { protocol: "orca".into(), pair: "USX-USDC".into(), last_window: "1h".into() };
        store.save(&filters);
        assert_eq!(store.load(), Some(filters));
    }
}
