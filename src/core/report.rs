//! Report generation business logic.
//!
//! Dashboard-style summaries, rate previews and text formatting. All functions are
//! read-only views over a [`Household`] and return structured data that callers
//! can render however they like.

use crate::{
    core::{engine, household::Household, shared::SharedExpenseAccount},
    errors::Result,
    models::{Member, MemberId, Transaction, TransactionKind},
};

/// Whether a member has paid in more than they ate or the other way round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MemberStanding {
    /// Balance ≥ 0; the household owes the member this amount
    Advanced(f64),
    /// Balance < 0; the member owes the household this amount
    Due(f64),
}

impl MemberStanding {
    /// Classifies a member by the sign of their balance.
    #[must_use]
    pub fn of(member: &Member) -> Self {
        let balance = member.balance();
        if balance >= 0.0 {
            Self::Advanced(balance)
        } else {
            Self::Due(balance.abs())
        }
    }
}

/// A member's share of the meals, for ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealConsumer {
    /// Member id
    pub member_id: MemberId,
    /// Member name
    pub name: String,
    /// Member's meal total
    pub total_meals: u32,
}

/// Household-wide figures shown on a dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct HouseholdSummary {
    /// Members on the roster
    pub member_count: usize,
    /// Members flagged as paid
    pub paid_count: usize,
    /// Members not flagged as paid
    pub unpaid_count: usize,
    /// Current shared expense total
    pub shared_expense_total: f64,
    /// Sum of individual contributions
    pub total_individual_expense: f64,
    /// Meals eaten by everybody
    pub total_meals: u64,
    /// Current cost per meal
    pub meal_rate: f64,
    /// Sum of positive balances
    pub total_advanced: f64,
    /// Sum of negative balances, as a positive amount
    pub total_due: f64,
    /// Ledger entries across all members
    pub total_transactions: usize,
    /// Dates with saved meal entries
    pub meal_days: usize,
    /// Meals per member
    pub average_meals_per_member: f64,
    /// Meals per logged date
    pub average_meals_per_day: f64,
    /// Members ranked by meals eaten, most first
    pub top_consumers: Vec<MealConsumer>,
}

/// Rate before and after a prospective shared adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePreview {
    /// Shared total the adjustment would produce
    pub new_shared_total: f64,
    /// Rate today
    pub current_rate: f64,
    /// Rate after the adjustment
    pub new_rate: f64,
    /// `new_rate - current_rate`
    pub change: f64,
}

/// Number of members listed in [`HouseholdSummary::top_consumers`].
pub const TOP_CONSUMER_LIMIT: usize = 3;

/// Builds the dashboard summary for a household.
#[must_use]
pub fn summarize(household: &Household) -> HouseholdSummary {
    let members = household.members();
    let paid_count = members.iter().filter(|m| m.has_paid()).count();
    let total_meals = household.total_meals();
    let meal_days = household.meal_log().logged_days();

    let total_advanced = members
        .iter()
        .map(Member::balance)
        .filter(|balance| *balance > 0.0)
        .sum::<f64>();
    let total_due = members
        .iter()
        .map(Member::balance)
        .filter(|balance| *balance < 0.0)
        .sum::<f64>()
        .abs();

    let mut ranked: Vec<&Member> = members.iter().collect();
    ranked.sort_by(|a, b| b.total_meals().cmp(&a.total_meals()).then(a.id().cmp(&b.id())));
    let top_consumers = ranked
        .into_iter()
        .take(TOP_CONSUMER_LIMIT)
        .map(|m| MealConsumer {
            member_id: m.id(),
            name: m.name().to_string(),
            total_meals: m.total_meals(),
        })
        .collect();

    HouseholdSummary {
        member_count: members.len(),
        paid_count,
        unpaid_count: members.len() - paid_count,
        shared_expense_total: household.shared_expense_total(),
        total_individual_expense: household.total_individual_expense(),
        total_meals,
        meal_rate: household.meal_rate(),
        total_advanced: engine::round_money(total_advanced),
        total_due: engine::round_money(total_due),
        total_transactions: members.iter().map(|m| m.individual_expenses().len()).sum(),
        meal_days,
        average_meals_per_member: average(total_meals, members.len()),
        average_meals_per_day: average(total_meals, meal_days),
        top_consumers,
    }
}

// Counts here are small enough for exact f64 conversion.
#[allow(clippy::cast_precision_loss)]
fn average(total: u64, count: usize) -> f64 {
    total as f64 / count.max(1) as f64
}

/// Shows what the meal rate would become after a shared adjustment, without applying it.
///
/// Fails the same way the adjustment itself would.
pub fn preview_shared_adjustment(
    household: &Household,
    amount: f64,
    direction: TransactionKind,
) -> Result<RatePreview> {
    let account = SharedExpenseAccount::new(household.shared_expense_total());
    let new_shared_total = account.check(amount, direction)?;
    let current_rate = household.meal_rate();
    let new_rate = engine::meal_rate(household.total_meals(), new_shared_total);

    Ok(RatePreview {
        new_shared_total,
        current_rate,
        new_rate,
        change: new_rate - current_rate,
    })
}

/// Formats an amount with an explicit sign, e.g. `+50.00` or `-25.50`.
#[must_use]
pub fn format_money(amount: f64) -> String {
    if amount >= 0.0 {
        format!("+{amount:.2}")
    } else {
        format!("-{:.2}", amount.abs())
    }
}

/// One-line summary of a ledger entry: `+1500.00 | add | Bazar`.
#[must_use]
pub fn format_transaction_summary(transaction: &Transaction) -> String {
    let amount = format_money(transaction.kind.signed(transaction.amount));
    format!(
        "{amount} | {} | {}",
        transaction.kind.as_str(),
        transaction.description
    )
}

/// Renders a multi-line household report for logs.
#[must_use]
pub fn format_summary(title: &str, household: &Household) -> String {
    use std::fmt::Write;

    let summary = summarize(household);
    let mut out = format!(
        "{title} - {} members | {} meals | rate {:.2}\n",
        summary.member_count, summary.total_meals, summary.meal_rate
    );
    let _ = writeln!(
        out,
        "  Shared expense {:.2} | Individual {:.2} | Advanced {:.2} | Due {:.2}",
        summary.shared_expense_total,
        summary.total_individual_expense,
        summary.total_advanced,
        summary.total_due
    );

    for member in household.members() {
        let standing = match MemberStanding::of(member) {
            MemberStanding::Advanced(amount) => format!("advanced {amount:.2}"),
            MemberStanding::Due(amount) => format!("due {amount:.2}"),
        };
        let _ = writeln!(
            out,
            "  {} - {} meals | paid {:.2} | cost {:.2} | {standing}",
            member.name(),
            member.total_meals(),
            member.total_individual_expense(),
            member.meal_cost()
        );
    }

    out
}
