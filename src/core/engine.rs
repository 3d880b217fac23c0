//! Rate & balance engine.
//!
//! Pure functions of the current roster and shared total. Nothing here keeps state,
//! so the figures can be rebuilt from scratch at any time and must agree with what
//! the household reports.

use crate::core::registry::MemberRegistry;

/// Rounds a money value to whole cents.
#[must_use]
pub fn round_money(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Cost per meal: shared total spread over every meal eaten.
///
/// Returns 0 when no meals have been recorded.
#[must_use]
pub fn meal_rate(total_meals: u64, shared_total: f64) -> f64 {
    if total_meals == 0 {
        return 0.0;
    }

    // Meal counts stay far below 2^52, the conversion is exact.
    #[allow(clippy::cast_precision_loss)]
    let meals = total_meals as f64;
    shared_total / meals
}

/// Derived cost figures for a single member.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemberCosts {
    /// Meals times rate, in whole cents
    pub meal_cost: f64,
    /// Individual expense minus meal cost, in whole cents
    pub balance: f64,
}

/// Computes a member's meal cost and balance at the given rate.
#[must_use]
pub fn member_costs(total_meals: u32, total_individual_expense: f64, meal_rate: f64) -> MemberCosts {
    let meal_cost = f64::from(total_meals) * meal_rate;
    let balance = total_individual_expense - meal_cost;

    MemberCosts {
        meal_cost: round_money(meal_cost),
        balance: round_money(balance),
    }
}

/// Recomputes the meal rate and writes every member's derived figures.
///
/// Must run after every mutation, before anything reads a balance.
pub fn recompute(registry: &mut MemberRegistry, shared_total: f64) -> f64 {
    let rate = meal_rate(registry.total_meals(), shared_total);
    registry.apply_derived_state(rate);
    rate
}
