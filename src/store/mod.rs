//! Persistence port for household state.
//!
//! State is kept as three independent JSON slices under fixed keys. Loading never
//! fails: a missing, unreadable or undecodable slice falls back to the caller's
//! default and is logged.

/// `SeaORM` key-value store over the `system_state` table
pub mod database;
/// In-process store
pub mod memory;

pub use database::SeaOrmStore;
pub use memory::MemoryStore;

use crate::errors::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::{debug, warn};

/// Key of the member roster slice
pub const MEMBERS_KEY: &str = "meal_manager.members";
/// Key of the daily meal log slice
pub const DAILY_MEALS_KEY: &str = "meal_manager.daily_meals";
/// Key of the shared expense total slice
pub const SHARED_EXPENSE_KEY: &str = "meal_manager.shared_expense";

/// Durable key-value storage for serialized state slices.
pub trait StateStore {
    /// Returns the stored value, or `None` if the key was never saved.
    fn load(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Stores a value, replacing any previous one.
    fn save(&self, key: &str, value: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Loads and decodes a slice, falling back to `default` on any failure.
pub async fn load_or_default<S, T, F>(store: &S, key: &str, default: F) -> T
where
    S: StateStore + Sync,
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    match store.load(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!("Loaded state slice '{}'", key);
                value
            }
            Err(e) => {
                warn!("State slice '{}' could not be decoded, using default: {}", key, e);
                default()
            }
        },
        Ok(None) => {
            debug!("State slice '{}' not found, using default", key);
            default()
        }
        Err(e) => {
            warn!("Failed to load state slice '{}', using default: {}", key, e);
            default()
        }
    }
}

/// Encodes and stores a slice.
pub async fn save_slice<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: StateStore + Sync,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.save(key, &raw).await
}
