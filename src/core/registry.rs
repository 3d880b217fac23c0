//! Member registry - the roster and its cumulative per-member fields.

use crate::{
    core::engine,
    errors::{Error, Result},
    models::{Member, MemberId},
};

/// Ordered set of members. Insertion order is the display order and never changes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemberRegistry {
    members: Vec<Member>,
}

impl MemberRegistry {
    /// Wraps an already loaded roster.
    #[must_use]
    pub const fn new(members: Vec<Member>) -> Self {
        Self { members }
    }

    /// All members in insertion order.
    #[must_use]
    pub fn list_members(&self) -> &[Member] {
        &self.members
    }

    /// Looks up a member, failing with [`Error::MemberNotFound`] for unknown ids.
    pub fn get_member(&self, id: MemberId) -> Result<&Member> {
        self.members
            .iter()
            .find(|member| member.id == id)
            .ok_or(Error::MemberNotFound { id })
    }

    pub(crate) fn get_member_mut(&mut self, id: MemberId) -> Result<&mut Member> {
        self.members
            .iter_mut()
            .find(|member| member.id == id)
            .ok_or(Error::MemberNotFound { id })
    }

    /// Adds a member with zero totals.
    ///
    /// The name is trimmed; empty names and names already on the roster
    /// (ignoring case) are rejected.
    pub(crate) fn add_member(&mut self, name: &str) -> Result<&Member> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation {
                message: "Member name cannot be empty".to_string(),
            });
        }

        if self
            .members
            .iter()
            .any(|member| member.name.eq_ignore_ascii_case(name))
        {
            return Err(Error::Validation {
                message: format!("A member named '{name}' already exists"),
            });
        }

        let id = self.members.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        self.members.push(Member::new(id, name.to_string()));
        self.get_member(id)
    }

    /// Writes meal cost and balance for every member at the given rate.
    ///
    /// Idempotent: only the two derived fields are touched and both are pure
    /// functions of the member's totals and the rate.
    pub fn apply_derived_state(&mut self, meal_rate: f64) {
        for member in &mut self.members {
            let costs = engine::member_costs(
                member.total_meals,
                member.total_individual_expense,
                meal_rate,
            );
            member.meal_cost = costs.meal_cost;
            member.balance = costs.balance;
        }
    }

    /// Sum of every member's meal total.
    #[must_use]
    pub fn total_meals(&self) -> u64 {
        self.members.iter().map(|m| u64::from(m.total_meals)).sum()
    }

    /// Sum of every member's individual expense total.
    #[must_use]
    pub fn total_individual_expense(&self) -> f64 {
        engine::round_money(self.members.iter().map(|m| m.total_individual_expense).sum())
    }

    /// Id for the next ledger entry: one past the highest id on any member's ledger.
    #[must_use]
    pub fn next_transaction_id(&self) -> i64 {
        self.members
            .iter()
            .flat_map(|m| m.individual_expenses.iter())
            .map(|t| t.id)
            .max()
            .unwrap_or(0)
            + 1
    }
}
