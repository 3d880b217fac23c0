//! Household domain records: members and their individual-expense ledger entries.
//!
//! These are the shapes that get persisted. Their running totals can only be moved
//! by the crate's own operations, which keeps each total tied to the entry that
//! produced it.

use crate::{
    core::engine::round_money,
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable member identifier, assigned in roster insertion order.
pub type MemberId = i64;

/// Direction of a money movement, shared by ledger entries and shared-account adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money added
    Add,
    /// Money taken back out
    Subtract,
}

impl TransactionKind {
    /// Lowercase label used in summaries and serialized state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
        }
    }

    /// Applies the direction's sign to a positive magnitude.
    #[must_use]
    pub fn signed(self, amount: f64) -> f64 {
        match self {
            Self::Add => amount,
            Self::Subtract => -amount,
        }
    }
}

/// One immutable individual-expense ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique across the household, increasing in creation order
    pub id: i64,
    /// When the entry was recorded
    pub date: DateTime<Utc>,
    /// Positive magnitude
    pub amount: f64,
    /// Free text, never empty
    pub description: String,
    /// Whether the amount was added or subtracted
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    /// Folds this entry into a running total, normalised to whole cents.
    ///
    /// Both the incremental member total and the from-scratch ledger sum go through
    /// here, so the two can be compared exactly.
    #[must_use]
    pub fn apply_to(&self, total: f64) -> f64 {
        round_money(total + self.kind.signed(self.amount))
    }
}

/// A roster member with cumulative totals and derived cost figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub(crate) id: MemberId,
    pub(crate) name: String,
    pub(crate) total_meals: u32,
    pub(crate) total_individual_expense: f64,
    pub(crate) individual_expenses: Vec<Transaction>,
    pub(crate) has_paid: bool,
    #[serde(default)]
    pub(crate) meal_cost: f64,
    #[serde(default)]
    pub(crate) balance: f64,
}

impl Member {
    pub(crate) fn new(id: MemberId, name: String) -> Self {
        Self {
            id,
            name,
            total_meals: 0,
            total_individual_expense: 0.0,
            individual_expenses: Vec::new(),
            has_paid: false,
            meal_cost: 0.0,
            balance: 0.0,
        }
    }

    /// Roster id.
    #[must_use]
    pub const fn id(&self) -> MemberId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sum of every meal delta recorded for this member.
    #[must_use]
    pub const fn total_meals(&self) -> u32 {
        self.total_meals
    }

    /// Ledger adds minus ledger subtracts.
    #[must_use]
    pub const fn total_individual_expense(&self) -> f64 {
        self.total_individual_expense
    }

    /// Ledger entries in the order they were recorded.
    #[must_use]
    pub fn individual_expenses(&self) -> &[Transaction] {
        &self.individual_expenses
    }

    /// Heuristic payment flag: true while the member has a positive contribution.
    #[must_use]
    pub const fn has_paid(&self) -> bool {
        self.has_paid
    }

    /// Meals eaten times the current meal rate, in whole cents.
    #[must_use]
    pub const fn meal_cost(&self) -> f64 {
        self.meal_cost
    }

    /// Contribution minus meal cost. Positive means advanced, negative means due.
    #[must_use]
    pub const fn balance(&self) -> f64 {
        self.balance
    }

    /// Recomputes the individual expense total from the ledger alone.
    #[must_use]
    pub fn ledger_total(&self) -> f64 {
        self.individual_expenses
            .iter()
            .fold(0.0, |total, transaction| transaction.apply_to(total))
    }

    /// Appends a validated entry and moves the running total with it.
    pub(crate) fn push_transaction(&mut self, transaction: Transaction) {
        let new_total = transaction.apply_to(self.total_individual_expense);
        self.has_paid = match transaction.kind {
            TransactionKind::Add => true,
            TransactionKind::Subtract => new_total > 0.0,
        };
        self.total_individual_expense = new_total;
        self.individual_expenses.push(transaction);
    }

    /// Meal total after a net change, without applying it.
    ///
    /// # Errors
    /// * [`Error::InsufficientMeals`] - the total would drop below zero
    /// * [`Error::Validation`] - the total would overflow the counter
    pub(crate) fn meals_after(&self, change: i64) -> Result<u32> {
        let next = i64::from(self.total_meals) + change;
        if next < 0 {
            return Err(Error::InsufficientMeals {
                member: self.name.clone(),
                current: self.total_meals,
                requested: u32::try_from(-change).unwrap_or(u32::MAX),
            });
        }

        u32::try_from(next).map_err(|_| Error::Validation {
            message: format!("{} cannot have more than {} meals", self.name, u32::MAX),
        })
    }

    /// Moves the meal total by a net change. On error the total is unchanged.
    pub(crate) fn apply_meal_change(&mut self, change: i64) -> Result<()> {
        self.total_meals = self.meals_after(change)?;
        Ok(())
    }
}
