//! Entity module - `SeaORM` entity definitions for the state database.
//! Household state is persisted as serialized slices, so a single key-value
//! table is all the schema there is.

/// Key-value rows holding serialized household state.
pub mod system_state;

pub use system_state::{
    Column as SystemStateColumn, Entity as SystemState, Model as SystemStateModel,
};
