//! Transaction ledger - append-only individual expense entries.
//!
//! Recording an entry is a single compound operation with two effects: the member's
//! ledger and running total move, and the same signed amount is mirrored into the
//! shared expense account. Every precondition for both effects is checked before
//! either one is applied.

use crate::{
    core::{registry::MemberRegistry, shared::SharedExpenseAccount, shared::normalize_amount},
    errors::{Error, Result},
    models::{MemberId, Transaction, TransactionKind},
};
use chrono::{DateTime, Utc};

/// Records an individual expense entry and mirrors it into the shared account.
///
/// # Errors
/// * [`Error::InvalidAmount`] - amount is not finite or rounds to zero or below
///
/// The amount is stored and mirrored in whole cents.
/// * [`Error::Validation`] - description is empty after trimming
/// * [`Error::MemberNotFound`] - unknown member
/// * [`Error::InsufficientBalance`] - subtraction larger than the member's total
/// * [`Error::InsufficientFunds`] - subtraction larger than the shared total
///
/// On any error neither the member nor the shared account changes.
pub fn record_transaction(
    registry: &mut MemberRegistry,
    account: &mut SharedExpenseAccount,
    member_id: MemberId,
    amount: f64,
    description: &str,
    kind: TransactionKind,
    now: DateTime<Utc>,
) -> Result<Transaction> {
    let amount = normalize_amount(amount)?;

    let description = description.trim();
    if description.is_empty() {
        return Err(Error::Validation {
            message: "Description cannot be empty".to_string(),
        });
    }

    let id = registry.next_transaction_id();
    let member = registry.get_member_mut(member_id)?;

    if kind == TransactionKind::Subtract && amount > member.total_individual_expense {
        return Err(Error::InsufficientBalance {
            member: member.name.clone(),
            current: member.total_individual_expense,
            requested: amount,
        });
    }

    // Last fallible step; once it succeeds the member update cannot fail.
    account.adjust(amount, kind)?;

    let transaction = Transaction {
        id,
        date: now,
        amount,
        description: description.to_string(),
        kind,
    };
    member.push_transaction(transaction.clone());

    Ok(transaction)
}
