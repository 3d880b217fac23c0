//! `SQLite`-backed state store built on `SeaORM`.
//!
//! Each slice is one row of the `system_state` key-value table. Saving updates the
//! row for the key if it exists and inserts it otherwise.

use crate::{
    entities::{SystemState, system_state},
    errors::Result,
    store::StateStore,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{debug, instrument};

/// State store over a `SeaORM` connection.
#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    /// Wraps a connection whose tables already exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl StateStore for SeaOrmStore {
    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let state = SystemState::find()
            .filter(system_state::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        Ok(state.map(|s| s.value))
    }

    #[instrument(skip(self, value), fields(bytes = value.len()))]
    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        let existing = SystemState::find()
            .filter(system_state::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        if let Some(state) = existing {
            let mut active_model: system_state::ActiveModel = state.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
            debug!("Updated state slice");
        } else {
            let new_state = system_state::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_state.insert(&self.db).await?;
            debug!("Inserted state slice");
        }

        Ok(())
    }
}
