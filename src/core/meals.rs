//! Daily meal log - per-date, per-member lunch and dinner deltas.
//!
//! A save for a date is all-or-nothing: every member's resulting meal total is
//! validated against the pre-save roster before any member is touched.
//!
//! Saving a date that already has entries replaces that date's entry set and moves
//! each member's total only by the difference between the new and the stored entry.
//! The meal total of a member therefore always equals the sum of its stored entries.

use crate::{
    core::registry::MemberRegistry,
    errors::{Error, Result},
    models::MemberId,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest accepted lunch or dinner delta
pub const MIN_MEAL_DELTA: i32 = -2;
/// Largest accepted lunch or dinner delta
pub const MAX_MEAL_DELTA: i32 = 2;

/// Raw lunch/dinner input for one member. Values outside the accepted range are clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MealInput {
    /// Lunch delta
    pub lunch: i32,
    /// Dinner delta
    pub dinner: i32,
}

impl MealInput {
    /// Raw counts as entered; clamped when turned into an entry.
    #[must_use]
    pub const fn new(lunch: i32, dinner: i32) -> Self {
        Self { lunch, dinner }
    }
}

/// Stored meal entry for one member on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    /// Lunch delta in [-2, 2]
    pub lunch: i32,
    /// Dinner delta in [-2, 2]
    pub dinner: i32,
    /// `lunch + dinner`
    pub meals: i32,
    /// Whether the entry removes meals
    pub is_correction: bool,
}

impl MealEntry {
    /// Clamps both deltas into range and derives the combined count.
    #[must_use]
    pub fn from_input(input: MealInput) -> Self {
        let lunch = input.lunch.clamp(MIN_MEAL_DELTA, MAX_MEAL_DELTA);
        let dinner = input.dinner.clamp(MIN_MEAL_DELTA, MAX_MEAL_DELTA);
        let meals = lunch + dinner;
        Self {
            lunch,
            dinner,
            meals,
            is_correction: meals < 0,
        }
    }
}

/// Entries for a single date, keyed by member.
pub type DayRecord = BTreeMap<MemberId, MealEntry>;

/// What a successful save did, for the caller to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealSaveOutcome {
    /// Date that was saved
    pub date: NaiveDate,
    /// Number of members with a stored entry for the date
    pub entries: usize,
    /// Meals added by positive entries
    pub added: u32,
    /// Meals removed by correction entries
    pub corrected: u32,
    /// Net change applied to the household meal total (differs from
    /// `added - corrected` when the date was saved before)
    pub net_change: i64,
}

/// Every saved date with its entries, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealLog {
    days: BTreeMap<NaiveDate, DayRecord>,
}

impl MealLog {
    /// Dates with stored entries, oldest first.
    pub fn days(&self) -> impl Iterator<Item = (&NaiveDate, &DayRecord)> {
        self.days.iter()
    }

    /// Entries saved for a date.
    #[must_use]
    pub fn day(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days.get(&date)
    }

    /// One member's entry for a date.
    #[must_use]
    pub fn entry(&self, date: NaiveDate, member_id: MemberId) -> Option<&MealEntry> {
        self.days.get(&date).and_then(|day| day.get(&member_id))
    }

    /// Number of dates with stored entries.
    #[must_use]
    pub fn logged_days(&self) -> usize {
        self.days.len()
    }

    /// Combined meal delta stored for a date, 0 if nothing was saved.
    #[must_use]
    pub fn meals_on(&self, date: NaiveDate) -> i64 {
        self.days
            .get(&date)
            .map_or(0, |day| day.values().map(|e| i64::from(e.meals)).sum())
    }

    /// Sum of every stored delta for one member across all dates.
    #[must_use]
    pub fn member_total(&self, member_id: MemberId) -> i64 {
        self.days
            .values()
            .filter_map(|day| day.get(&member_id))
            .map(|e| i64::from(e.meals))
            .sum()
    }

    /// Saves the entry set for a date and moves member meal totals accordingly.
    ///
    /// Entries whose clamped lunch and dinner cancel out are dropped. Later entries
    /// for the same member override earlier ones.
    ///
    /// # Errors
    /// * [`Error::EmptyInput`] - no entry has a nonzero delta
    /// * [`Error::MemberNotFound`] - an entry names an unknown member
    /// * [`Error::InsufficientMeals`] - a member would end up below zero meals
    ///
    /// On any error neither the log nor any member changes.
    pub fn record_daily_meals<I>(
        &mut self,
        registry: &mut MemberRegistry,
        date: NaiveDate,
        entries: I,
    ) -> Result<MealSaveOutcome>
    where
        I: IntoIterator<Item = (MemberId, MealInput)>,
    {
        let new_day: DayRecord = entries
            .into_iter()
            .map(|(member_id, input)| (member_id, MealEntry::from_input(input)))
            .collect::<DayRecord>()
            .into_iter()
            .filter(|(_, entry)| entry.meals != 0)
            .collect();

        if new_day.is_empty() {
            return Err(Error::EmptyInput);
        }

        let mut changes: BTreeMap<MemberId, i64> = BTreeMap::new();
        for (member_id, entry) in &new_day {
            *changes.entry(*member_id).or_default() += i64::from(entry.meals);
        }
        if let Some(previous) = self.days.get(&date) {
            for (member_id, entry) in previous {
                *changes.entry(*member_id).or_default() -= i64::from(entry.meals);
            }
        }

        let mut new_totals = Vec::with_capacity(changes.len());
        for (&member_id, &change) in &changes {
            let total = registry.get_member(member_id)?.meals_after(change)?;
            new_totals.push((member_id, total));
        }

        for (member_id, total) in new_totals {
            registry.get_member_mut(member_id)?.total_meals = total;
        }

        let added = new_day
            .values()
            .filter(|e| e.meals > 0)
            .map(|e| e.meals.unsigned_abs())
            .sum();
        let corrected = new_day
            .values()
            .filter(|e| e.meals < 0)
            .map(|e| e.meals.unsigned_abs())
            .sum();
        let outcome = MealSaveOutcome {
            date,
            entries: new_day.len(),
            added,
            corrected,
            net_change: changes.values().sum(),
        };

        self.days.insert(date, new_day);
        Ok(outcome)
    }
}
