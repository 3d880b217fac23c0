//! Household - owns the roster, the shared account and the meal log.
//!
//! All mutation goes through the methods here. Each one delegates to the component
//! that owns the invariant, then refreshes derived member figures before returning,
//! so a reader never sees a stale balance.

use crate::{
    core::{
        engine, ledger,
        meals::{MealInput, MealLog, MealSaveOutcome},
        registry::MemberRegistry,
        shared::SharedExpenseAccount,
    },
    errors::Result,
    models::{Member, MemberId, Transaction, TransactionKind},
};
use chrono::{NaiveDate, Utc};

/// A stored total that disagrees with the records it is supposed to summarise.
#[derive(Debug, Clone, PartialEq)]
pub enum Discrepancy {
    /// Running individual expense differs from the ledger sum
    IndividualExpense {
        /// Affected member
        member_id: MemberId,
        /// Total held on the member
        recorded: f64,
        /// Total rebuilt from ledger entries
        from_ledger: f64,
    },
    /// Meal total differs from the sum of meal log entries
    Meals {
        /// Affected member
        member_id: MemberId,
        /// Total held on the member
        recorded: u32,
        /// Total rebuilt from the meal log
        from_log: i64,
    },
    /// Meal log references a member that is not on the roster
    UnknownMember {
        /// Id found in the log
        member_id: MemberId,
        /// First date carrying that id
        date: NaiveDate,
    },
}

/// In-memory household state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Household {
    registry: MemberRegistry,
    shared: SharedExpenseAccount,
    meals: MealLog,
}

impl Household {
    /// Empty household: no members, no meals, zero shared total.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a household from persisted slices and derives every balance.
    #[must_use]
    pub fn from_parts(members: Vec<Member>, meals: MealLog, shared_total: f64) -> Self {
        let mut household = Self {
            registry: MemberRegistry::new(members),
            shared: SharedExpenseAccount::new(shared_total),
            meals,
        };
        household.recompute();
        household
    }

    /// Adds a member with no meals and no contributions.
    pub fn add_member(&mut self, name: &str) -> Result<Member> {
        let member = self.registry.add_member(name)?.clone();
        self.recompute();
        Ok(member)
    }

    /// Records money a member put in; the shared total rises by the same amount.
    pub fn add_individual_expense(
        &mut self,
        member_id: MemberId,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        self.record_transaction(member_id, amount, description, TransactionKind::Add)
    }

    /// Records money returned to a member; the shared total drops by the same amount.
    pub fn subtract_individual_expense(
        &mut self,
        member_id: MemberId,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        self.record_transaction(member_id, amount, description, TransactionKind::Subtract)
    }

    fn record_transaction(
        &mut self,
        member_id: MemberId,
        amount: f64,
        description: &str,
        kind: TransactionKind,
    ) -> Result<Transaction> {
        let transaction = ledger::record_transaction(
            &mut self.registry,
            &mut self.shared,
            member_id,
            amount,
            description,
            kind,
            Utc::now(),
        )?;
        self.recompute();
        Ok(transaction)
    }

    /// Raises the shared total directly and returns the new total.
    pub fn add_to_shared_expense(&mut self, amount: f64) -> Result<f64> {
        self.adjust_shared_expense(amount, TransactionKind::Add)
    }

    /// Lowers the shared total directly and returns the new total.
    pub fn subtract_from_shared_expense(&mut self, amount: f64) -> Result<f64> {
        self.adjust_shared_expense(amount, TransactionKind::Subtract)
    }

    fn adjust_shared_expense(&mut self, amount: f64, direction: TransactionKind) -> Result<f64> {
        let total = self.shared.adjust(amount, direction)?;
        self.recompute();
        Ok(total)
    }

    /// Saves meal entries for a date. See [`MealLog::record_daily_meals`].
    pub fn record_daily_meals<I>(&mut self, date: NaiveDate, entries: I) -> Result<MealSaveOutcome>
    where
        I: IntoIterator<Item = (MemberId, MealInput)>,
    {
        let outcome = self
            .meals
            .record_daily_meals(&mut self.registry, date, entries)?;
        self.recompute();
        Ok(outcome)
    }

    fn recompute(&mut self) {
        engine::recompute(&mut self.registry, self.shared.total());
    }

    /// Members in roster order.
    #[must_use]
    pub fn members(&self) -> &[Member] {
        self.registry.list_members()
    }

    /// Looks up one member.
    pub fn member(&self, id: MemberId) -> Result<&Member> {
        self.registry.get_member(id)
    }

    /// Every saved day of meal entries.
    #[must_use]
    pub const fn meal_log(&self) -> &MealLog {
        &self.meals
    }

    /// Current shared expense total.
    #[must_use]
    pub const fn shared_expense_total(&self) -> f64 {
        self.shared.total()
    }

    /// Meals eaten across all members.
    #[must_use]
    pub fn total_meals(&self) -> u64 {
        self.registry.total_meals()
    }

    /// Sum of every member's individual expense total.
    #[must_use]
    pub fn total_individual_expense(&self) -> f64 {
        self.registry.total_individual_expense()
    }

    /// Current cost per meal; 0 while nobody has eaten.
    #[must_use]
    pub fn meal_rate(&self) -> f64 {
        engine::meal_rate(self.total_meals(), self.shared.total())
    }

    /// Rebuilds every stored total from its source records and lists disagreements.
    ///
    /// An empty result means the incremental totals match a from-scratch recompute.
    #[must_use]
    pub fn audit(&self) -> Vec<Discrepancy> {
        let mut found = Vec::new();

        for member in self.members() {
            let from_ledger = member.ledger_total();
            if from_ledger.to_bits() != member.total_individual_expense.to_bits() {
                found.push(Discrepancy::IndividualExpense {
                    member_id: member.id,
                    recorded: member.total_individual_expense,
                    from_ledger,
                });
            }

            let from_log = self.meals.member_total(member.id);
            if from_log != i64::from(member.total_meals) {
                found.push(Discrepancy::Meals {
                    member_id: member.id,
                    recorded: member.total_meals,
                    from_log,
                });
            }
        }

        let mut reported = Vec::new();
        for (date, day) in self.meals.days() {
            for member_id in day.keys() {
                if self.registry.get_member(*member_id).is_err() && !reported.contains(member_id) {
                    reported.push(*member_id);
                    found.push(Discrepancy::UnknownMember {
                        member_id: *member_id,
                        date: *date,
                    });
                }
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{date, household_with_members};

    #[test]
    fn test_scenario_rate_and_balance() {
        // Shared 1000 over 10 meals; member 1 ate 4 and paid 300
        let (mut household, ids) = household_with_members(&["Injam", "Hasan"]);
        household
            .record_daily_meals(
                date(2025, 1, 1),
                [(ids[0], MealInput::new(2, 2)), (ids[1], MealInput::new(2, 2))],
            )
            .unwrap();
        household
            .record_daily_meals(date(2025, 1, 2), [(ids[1], MealInput::new(1, 1))])
            .unwrap();
        household.add_individual_expense(ids[0], 300.0, "Bazar").unwrap();
        household.add_to_shared_expense(700.0).unwrap();

        assert_eq!(household.shared_expense_total(), 1000.0);
        assert_eq!(household.total_meals(), 10);
        assert_eq!(household.meal_rate(), 100.0);

        let member = household.member(ids[0]).unwrap();
        assert_eq!(member.meal_cost(), 400.0);
        assert_eq!(member.balance(), -100.0);

        let other = household.member(ids[1]).unwrap();
        assert_eq!(other.meal_cost(), 600.0);
        assert_eq!(other.balance(), -600.0);
    }

    #[test]
    fn test_refund_larger_than_contribution_leaves_state_unchanged() {
        let (mut household, ids) = household_with_members(&["Injam"]);
        household.add_individual_expense(ids[0], 300.0, "Bazar").unwrap();
        let before = household.clone();

        let result = household.subtract_individual_expense(ids[0], 500.0, "refund");

        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
        assert_eq!(household, before);
        assert_eq!(household.shared_expense_total(), 300.0);
    }

    #[test]
    fn test_individual_expense_moves_shared_total_in_lockstep() {
        let (mut household, ids) = household_with_members(&["Injam"]);
        household.add_to_shared_expense(50.0).unwrap();

        household.add_individual_expense(ids[0], 100.0, "x").unwrap();
        assert_eq!(household.shared_expense_total(), 150.0);

        household.subtract_individual_expense(ids[0], 100.0, "x").unwrap();
        assert_eq!(household.shared_expense_total(), 50.0);
        assert!(!household.member(ids[0]).unwrap().has_paid());
    }

    #[test]
    fn test_rate_stays_zero_without_meals() {
        let (mut household, _) = household_with_members(&["Injam"]);
        household.add_to_shared_expense(500.0).unwrap();

        assert_eq!(household.meal_rate(), 0.0);
        assert_eq!(household.members()[0].meal_cost(), 0.0);
        assert_eq!(household.members()[0].balance(), 0.0);
    }

    #[test]
    fn test_balances_follow_every_mutation() {
        let (mut household, ids) = household_with_members(&["Injam", "Hasan"]);
        household
            .record_daily_meals(
                date(2025, 1, 1),
                [(ids[0], MealInput::new(1, 1)), (ids[1], MealInput::new(1, 1))],
            )
            .unwrap();
        household.add_individual_expense(ids[0], 400.0, "Bazar").unwrap();
        assert_eq!(household.member(ids[0]).unwrap().balance(), 200.0);

        household.subtract_from_shared_expense(200.0).unwrap();
        assert_eq!(household.meal_rate(), 50.0);
        assert_eq!(household.member(ids[0]).unwrap().balance(), 300.0);
        assert_eq!(household.member(ids[1]).unwrap().balance(), -100.0);
    }

    #[test]
    fn test_audit_clean_after_mixed_operations() {
        let (mut household, ids) = household_with_members(&["Injam", "Hasan", "Nadim"]);
        household.add_individual_expense(ids[0], 1500.0, "Bazar").unwrap();
        household.add_individual_expense(ids[1], 0.1, "Salt").unwrap();
        household.add_individual_expense(ids[1], 0.2, "Chili").unwrap();
        household.subtract_individual_expense(ids[0], 499.99, "Refund").unwrap();
        household
            .record_daily_meals(
                date(2025, 1, 1),
                [(ids[0], MealInput::new(1, 1)), (ids[2], MealInput::new(1, 0))],
            )
            .unwrap();
        household
            .record_daily_meals(date(2025, 1, 2), [(ids[0], MealInput::new(-1, 0))])
            .unwrap();

        assert!(household.audit().is_empty());
        assert_eq!(household.member(ids[1]).unwrap().total_individual_expense(), 0.3);
        assert_eq!(household.total_individual_expense(), 1000.31);
    }

    #[test]
    fn test_from_parts_recomputes_and_audit_flags_drift() {
        let (mut household, ids) = household_with_members(&["Injam"]);
        household
            .record_daily_meals(date(2025, 1, 1), [(ids[0], MealInput::new(2, 2))])
            .unwrap();
        household.add_individual_expense(ids[0], 200.0, "Bazar").unwrap();

        let mut members = household.members().to_vec();
        members[0].balance = 999.0;
        let rebuilt = Household::from_parts(
            members.clone(),
            household.meal_log().clone(),
            household.shared_expense_total(),
        );
        assert_eq!(rebuilt, household);

        members[0].total_meals = 7;
        let drifted = Household::from_parts(members, MealLog::default(), 200.0);
        assert_eq!(
            drifted.audit(),
            vec![Discrepancy::Meals {
                member_id: ids[0],
                recorded: 7,
                from_log: 0
            }]
        );
    }

    #[test]
    fn test_recompute_is_deterministic() {
        let (mut household, ids) = household_with_members(&["Injam", "Hasan", "Nadim"]);
        household
            .record_daily_meals(
                date(2025, 1, 1),
                [
                    (ids[0], MealInput::new(1, 1)),
                    (ids[1], MealInput::new(1, 0)),
                    (ids[2], MealInput::new(0, 1)),
                ],
            )
            .unwrap();
        household.add_to_shared_expense(1000.0).unwrap();

        let first = household.clone();
        household.recompute();
        household.recompute();

        assert_eq!(household, first);
        assert_eq!(household.member(ids[0]).unwrap().meal_cost(), 500.0);
        assert_eq!(household.member(ids[1]).unwrap().meal_cost(), 250.0);
    }
}
