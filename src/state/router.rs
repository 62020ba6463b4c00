//! Navigation menu and the selected entry.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::storage::{self, KeyValueStore};

pub const ROUTER_STORAGE_KEY: &str = "routerStore";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuItem {
    pub icon: &'static str,
    pub name: &'static str,
    pub route: &'static str,
    pub text: &'static str,
}

/// Fixed menu; the first entry is the home page.
pub const MENU: [MenuItem; 3] = [
    MenuItem { icon: "chat", name: "solution", route: "/web-solution-assistant", text: "Solution assistant" },
    MenuItem { icon: "history", name: "history", route: "/history", text: "History" },
    MenuItem { icon: "setting", name: "model-config", route: "/model-config", text: "Model config" },
];

#[derive(Debug, Default, Serialize, Deserialize)]
struct Persisted {
    #[serde(default)]
    current_route: Option<String>,
}

pub struct RouterStore {
    current: MenuItem,
    store: Option<Arc<dyn KeyValueStore>>,
}

impl std::fmt::Debug for RouterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterStore").field("current", &self.current.name).finish_non_exhaustive()
    }
}

impl Default for RouterStore {
    fn default() -> Self {
        Self { current: MENU[0], store: None }
    }
}

impl RouterStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the last selected entry from `store`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the store cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, ApiError> {
        let persisted: Persisted = storage::load_json(store.as_ref(), ROUTER_STORAGE_KEY)?.unwrap_or_default();
        let current = persisted.current_route.as_deref().map_or(MENU[0], menu_entry);
        Ok(Self { current, store: Some(store) })
    }

    #[must_use]
    pub fn menu_list(&self) -> &'static [MenuItem] {
        &MENU
    }

    #[must_use]
    pub fn current_route(&self) -> MenuItem {
        self.current
    }

    /// Select the entry called `name`; unknown names select the home page.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the selection cannot be persisted.
    pub fn set_current_route(&mut self, name: &str) -> Result<(), ApiError> {
        self.current = menu_entry(name);
        let Some(store) = &self.store else {
            return Ok(());
        };
        let persisted = Persisted { current_route: Some(self.current.name.to_owned()) };
        storage::save_json(store.as_ref(), ROUTER_STORAGE_KEY, &persisted)
    }
}

fn menu_entry(name: &str) -> MenuItem {
    MENU.iter().find(|item| item.name == name).copied().unwrap_or(MENU[0])
}
