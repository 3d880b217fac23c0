//! Core business logic - framework-agnostic reconciliation of meals and expenses.
//!
//! Everything in here is synchronous and in-memory. Each mutation validates against
//! the pre-mutation state, applies all of its effects, and then refreshes the derived
//! cost figures before returning.

/// Rate and balance derivation
pub mod engine;
/// State-owning household service
pub mod household;
/// Individual-expense ledger with the shared-account mirror
pub mod ledger;
/// Per-date meal counts
pub mod meals;
/// Member roster
pub mod registry;
/// Summaries, previews and formatting
pub mod report;
/// Pooled shared expense total
pub mod shared;

pub use household::{Discrepancy, Household};
pub use meals::{MealEntry, MealInput, MealLog, MealSaveOutcome};
pub use registry::MemberRegistry;
pub use shared::SharedExpenseAccount;
