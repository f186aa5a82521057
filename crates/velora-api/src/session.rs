//! # Session Store
//!
//! Key/value session state for the storefront, the analogue of the
//! browser's local storage.
//!
//! ## Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Key               Value (JSON)            Written by                   │
//! │  ───               ────────────            ──────────                   │
//! │  token             "eyJ..."                customer sign-in             │
//! │  user              { id, name, email }     customer sign-in             │
//! │  favorites         ["product-id", ...]     favorite toggle              │
//! │  recentlyViewed    ["product-id", ...]     product page visits (MRU)    │
//! │  adminToken        "eyJ..."                admin sign-in                │
//! │  adminUser         { email, name }         admin sign-in                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Values are stored as JSON strings so the typed helpers below stay
//! honest about what a page refresh would actually round-trip.
//!
//! ## Thread Safety
//! A plain `Mutex` over the map: many services touch the session, writes
//! are tiny, and lock hold times are a handful of string operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde::{de::DeserializeOwned, Serialize};

pub const KEY_TOKEN: &str = "token";
pub const KEY_USER: &str = "user";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_RECENTLY_VIEWED: &str = "recentlyViewed";
pub const KEY_ADMIN_TOKEN: &str = "adminToken";
pub const KEY_ADMIN_USER: &str = "adminUser";

/// Most-recently-viewed list is capped; oldest entries fall off.
pub const RECENTLY_VIEWED_CAP: usize = 8;

/// Session key/value store. Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw string read.
    pub fn get(&self, key: &str) -> Option<String> {
        let values = self.values.lock().expect("Session mutex poisoned");
        values.get(key).cloned()
    }

    /// Raw string write.
    pub fn set(&self, key: &str, value: impl Into<String>) {
        let mut values = self.values.lock().expect("Session mutex poisoned");
        values.insert(key.to_string(), value.into());
    }

    pub fn remove(&self, key: &str) {
        let mut values = self.values.lock().expect("Session mutex poisoned");
        values.remove(key);
    }

    /// Reads and deserializes a JSON value. A missing key or a value
    /// that no longer parses both read as `None`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    /// Serializes and writes a JSON value.
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, raw),
            Err(e) => tracing::error!(key, error = %e, "Failed to serialize session value"),
        }
    }

    /// Drops the customer session (token + user). Favorites and the
    /// recently-viewed list survive sign-out, as they do in the browser.
    pub fn clear_customer(&self) {
        self.remove(KEY_TOKEN);
        self.remove(KEY_USER);
    }

    pub fn clear_admin(&self) {
        self.remove(KEY_ADMIN_TOKEN);
        self.remove(KEY_ADMIN_USER);
    }

    // -------------------------------------------------------------------------
    // Favorites
    // -------------------------------------------------------------------------

    pub fn favorites(&self) -> Vec<String> {
        self.get_json(KEY_FAVORITES).unwrap_or_default()
    }

    /// Adds the product to favorites, or removes it if already present.
    /// Returns true when the product ends up favorited.
    pub fn toggle_favorite(&self, product_id: &str) -> bool {
        let mut favorites = self.favorites();
        let added = match favorites.iter().position(|id| id == product_id) {
            Some(index) => {
                favorites.remove(index);
                false
            }
            None => {
                favorites.push(product_id.to_string());
                true
            }
        };
        self.set_json(KEY_FAVORITES, &favorites);
        added
    }

    pub fn is_favorite(&self, product_id: &str) -> bool {
        self.favorites().iter().any(|id| id == product_id)
    }

    // -------------------------------------------------------------------------
    // Recently Viewed
    // -------------------------------------------------------------------------

    /// Most recent first.
    pub fn recently_viewed(&self) -> Vec<String> {
        self.get_json(KEY_RECENTLY_VIEWED).unwrap_or_default()
    }

    /// Records a product-page visit. Re-viewing moves the product to the
    /// front; the list is capped at [`RECENTLY_VIEWED_CAP`].
    pub fn record_view(&self, product_id: &str) {
        let mut viewed = self.recently_viewed();
        viewed.retain(|id| id != product_id);
        viewed.insert(0, product_id.to_string());
        viewed.truncate(RECENTLY_VIEWED_CAP);
        self.set_json(KEY_RECENTLY_VIEWED, &viewed);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
