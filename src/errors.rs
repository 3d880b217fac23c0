//! Unified error type for the ledger.
//!
//! Every rejected mutation maps to exactly one variant and leaves the household
//! untouched. The ambient variants cover configuration, storage and encoding.

use thiserror::Error;

/// All failures surfaced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input such as an empty description or member name
    #[error("Invalid input: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Amount that is zero, negative or not finite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// Individual subtraction larger than what the member has contributed
    #[error("{member} has only {current:.2} recorded, cannot subtract {requested:.2}")]
    InsufficientBalance {
        /// Member name
        member: String,
        /// Member's current individual expense total
        current: f64,
        /// Amount the caller tried to subtract
        requested: f64,
    },

    /// Shared subtraction larger than the shared total
    #[error("Insufficient funds: current total {current:.2}, required {required:.2}")]
    InsufficientFunds {
        /// Shared total before the attempt
        current: f64,
        /// Amount the caller tried to subtract
        required: f64,
    },

    /// Meal correction that would take a member below zero meals
    #[error("{member} has only {current} meals, cannot deduct {requested} meals")]
    InsufficientMeals {
        /// Member name
        member: String,
        /// Member's current meal total
        current: u32,
        /// Number of meals the correction removes
        requested: u32,
    },

    /// Meal save where every entry was zero
    #[error("Please enter at least one meal change")]
    EmptyInput,

    /// Unknown member id
    #[error("Member not found: {id}")]
    MemberNotFound {
        /// The id that was looked up
        id: i64,
    },

    /// Configuration could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details about the failure
        message: String,
    },

    /// Storage backend failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// State slice could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
