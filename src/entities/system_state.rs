//! System state entity - key-value rows holding serialized household state.
//! One row per slice: the member roster, the daily meal log and the shared
//! expense total.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key-value row
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "system_state")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Slice key (e.g., `"meal_manager.members"`)
    #[sea_orm(unique)]
    pub key: String,
    /// Slice contents as JSON
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When the slice was last saved
    pub updated_at: DateTime,
}

/// `SystemState` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
