//! Shared expense account - the pooled total every meal is charged against.
//!
//! Direct edits and the mirror of individual ledger entries both go through
//! [`SharedExpenseAccount::adjust`], so the two paths cannot drift apart.

use crate::{
    core::engine::round_money,
    errors::{Error, Result},
    models::TransactionKind,
};

/// Normalises an amount to whole cents, rejecting anything not finite or that
/// rounds to zero or below.
///
/// Every money movement goes through this, so the recorded amount is exactly the
/// amount the running totals move by.
pub(crate) fn normalize_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(Error::InvalidAmount { amount });
    }

    let cents = round_money(amount);
    if cents <= 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(cents)
}

/// Running shared expense total.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SharedExpenseAccount {
    total: f64,
}

impl SharedExpenseAccount {
    /// Opens the account at a total, normalised to whole cents.
    #[must_use]
    pub fn new(total: f64) -> Self {
        Self {
            total: round_money(total),
        }
    }

    /// Current pooled total.
    #[must_use]
    pub const fn total(&self) -> f64 {
        self.total
    }

    /// Validates an adjustment against the current total and returns the total it
    /// would produce, without changing anything. The amount is taken in whole cents.
    pub fn check(&self, amount: f64, direction: TransactionKind) -> Result<f64> {
        let amount = normalize_amount(amount)?;

        if direction == TransactionKind::Subtract && amount > self.total {
            return Err(Error::InsufficientFunds {
                current: self.total,
                required: amount,
            });
        }

        Ok(round_money(self.total + direction.signed(amount)))
    }

    /// Applies an adjustment and returns the new total. On error the total is unchanged.
    pub fn adjust(&mut self, amount: f64, direction: TransactionKind) -> Result<f64> {
        let new_total = self.check(amount, direction)?;
        self.total = new_total;
        Ok(new_total)
    }
}
