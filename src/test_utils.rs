//! Shared test utilities.
//!
//! This module provides common helpers for setting up test databases, households
//! with members, and stores that misbehave on purpose.

#![allow(clippy::unwrap_used)]

use crate::{
    core::Household,
    errors::{Error, Result},
    models::MemberId,
    store::StateStore,
};
use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

/// Installs a test-writer subscriber once; later calls are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Creates a household with the given members, returning their ids in order.
pub fn household_with_members(names: &[&str]) -> (Household, Vec<MemberId>) {
    let mut household = Household::new();
    let ids = names
        .iter()
        .map(|name| household.add_member(name).unwrap().id())
        .collect();
    (household, ids)
}

/// Store whose every call fails.
pub struct FailingStore;

impl StateStore for FailingStore {
    async fn load(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Database(sea_orm::DbErr::Custom("store offline".to_string())))
    }

    async fn save(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Database(sea_orm::DbErr::Custom("store offline".to_string())))
    }
}
