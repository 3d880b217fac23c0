//! Meal manager - the household plus its persistence.
//!
//! Every operation runs the in-memory mutation first and only then writes the slices
//! it touched. Writes are best effort: a storage failure is logged and the
//! operation still reports the mutation's own result.

use crate::{
    config::household::Config,
    core::{Household, MealInput, MealLog, MealSaveOutcome},
    errors::Result,
    models::{Member, MemberId, Transaction},
    store::{
        DAILY_MEALS_KEY, MEMBERS_KEY, SHARED_EXPENSE_KEY, StateStore, load_or_default, save_slice,
    },
};
use chrono::NaiveDate;
use tracing::{debug, error, info, instrument, warn};

/// Persisted slices of household state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slice {
    Members,
    DailyMeals,
    SharedExpense,
}

impl Slice {
    const fn key(self) -> &'static str {
        match self {
            Self::Members => MEMBERS_KEY,
            Self::DailyMeals => DAILY_MEALS_KEY,
            Self::SharedExpense => SHARED_EXPENSE_KEY,
        }
    }
}

/// Owns a [`Household`] and keeps a [`StateStore`] in step with it.
#[derive(Debug)]
pub struct MealManager<S> {
    household: Household,
    store: S,
}

impl<S: StateStore + Sync> MealManager<S> {
    /// Loads all three slices, falling back to an empty household for any that
    /// are missing or unreadable, and reports totals that disagree with their records.
    #[instrument(skip(store))]
    pub async fn load(store: S) -> Self {
        let members: Vec<Member> = load_or_default(&store, MEMBERS_KEY, Vec::new).await;
        let meals: MealLog = load_or_default(&store, DAILY_MEALS_KEY, MealLog::default).await;
        let shared_total: f64 = load_or_default(&store, SHARED_EXPENSE_KEY, || 0.0).await;

        let household = Household::from_parts(members, meals, shared_total);
        for discrepancy in household.audit() {
            warn!("Loaded state is inconsistent: {:?}", discrepancy);
        }
        info!(
            "Household loaded: {} members, {} meals, shared expense {:.2}",
            household.members().len(),
            household.total_meals(),
            household.shared_expense_total()
        );

        Self { household, store }
    }

    /// Current in-memory state.
    #[must_use]
    pub const fn household(&self) -> &Household {
        &self.household
    }

    /// Backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consumes the manager, returning the state and the store.
    pub fn into_parts(self) -> (Household, S) {
        (self.household, self.store)
    }

    /// Adds a member and persists the roster.
    #[instrument(skip(self))]
    pub async fn add_member(&mut self, name: &str) -> Result<Member> {
        let member = self.household.add_member(name)?;
        info!("Added member {} ({})", member.name(), member.id());
        self.persist(&[Slice::Members]).await;
        Ok(member)
    }

    /// Adds every configured member that is not on the roster yet.
    /// Returns how many were added.
    ///
    /// The roster is staged on a copy, so an invalid entry anywhere in the
    /// configuration leaves both the household and the store untouched.
    #[instrument(skip(self, config))]
    pub async fn seed_members(&mut self, config: &Config) -> Result<usize> {
        let mut staged = self.household.clone();
        let mut added = 0;
        for member_config in &config.members {
            let exists = staged
                .members()
                .iter()
                .any(|m| m.name().eq_ignore_ascii_case(member_config.name.trim()));
            if exists {
                debug!("Member '{}' already exists. Skipping.", member_config.name);
                continue;
            }

            staged
                .add_member(&member_config.name)
                .inspect_err(|e| warn!("Rejected configured member '{}': {}", member_config.name, e))?;
            added += 1;
        }
        self.household = staged;

        if added > 0 {
            info!("Seeded {} members from configuration", added);
            self.persist(&[Slice::Members]).await;
        }
        Ok(added)
    }

    /// Records an individual expense and persists the roster and shared total.
    #[instrument(skip(self))]
    pub async fn add_individual_expense(
        &mut self,
        member_id: MemberId,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let transaction = self
            .household
            .add_individual_expense(member_id, amount, description)?;
        info!(
            "{:.2} added for member {}. Total expense: {:.2}",
            amount,
            member_id,
            self.household.shared_expense_total()
        );
        self.persist(&[Slice::Members, Slice::SharedExpense]).await;
        Ok(transaction)
    }

    /// Takes back an individual expense and persists the roster and shared total.
    #[instrument(skip(self))]
    pub async fn subtract_individual_expense(
        &mut self,
        member_id: MemberId,
        amount: f64,
        description: &str,
    ) -> Result<Transaction> {
        let transaction = self
            .household
            .subtract_individual_expense(member_id, amount, description)?;
        info!(
            "{:.2} subtracted from member {}. Total expense: {:.2}",
            amount,
            member_id,
            self.household.shared_expense_total()
        );
        self.persist(&[Slice::Members, Slice::SharedExpense]).await;
        Ok(transaction)
    }

    /// Raises the shared total directly.
    #[instrument(skip(self))]
    pub async fn add_to_shared_expense(&mut self, amount: f64) -> Result<f64> {
        let total = self.household.add_to_shared_expense(amount)?;
        info!("{:.2} added to shared expense. New total: {:.2}", amount, total);
        self.persist(&[Slice::SharedExpense]).await;
        Ok(total)
    }

    /// Lowers the shared total directly.
    #[instrument(skip(self))]
    pub async fn subtract_from_shared_expense(&mut self, amount: f64) -> Result<f64> {
        let total = self.household.subtract_from_shared_expense(amount)?;
        info!(
            "{:.2} subtracted from shared expense. New total: {:.2}",
            amount, total
        );
        self.persist(&[Slice::SharedExpense]).await;
        Ok(total)
    }

    /// Saves one day's meal entries and persists the roster and meal log.
    #[instrument(skip(self, entries))]
    pub async fn record_daily_meals<I>(
        &mut self,
        date: NaiveDate,
        entries: I,
    ) -> Result<MealSaveOutcome>
    where
        I: IntoIterator<Item = (MemberId, MealInput)>,
    {
        let outcome = self.household.record_daily_meals(date, entries)?;
        info!(
            "Saved meal changes for {} (+{} meals, -{} corrected)",
            outcome.date, outcome.added, outcome.corrected
        );
        self.persist(&[Slice::Members, Slice::DailyMeals]).await;
        Ok(outcome)
    }

    async fn persist(&self, slices: &[Slice]) {
        for slice in slices {
            let result = match slice {
                Slice::Members => {
                    save_slice(&self.store, slice.key(), self.household.members()).await
                }
                Slice::DailyMeals => {
                    save_slice(&self.store, slice.key(), self.household.meal_log()).await
                }
                Slice::SharedExpense => {
                    save_slice(
                        &self.store,
                        slice.key(),
                        &self.household.shared_expense_total(),
                    )
                    .await
                }
            };

            if let Err(e) = result {
                error!("Error saving {}: {}", slice.key(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::config::household::MemberConfig;
    use crate::errors::Error;
    use crate::store::{MemoryStore, SeaOrmStore};
    use crate::test_utils::{FailingStore, date, init_test_tracing, setup_test_db};

    #[tokio::test]
    async fn test_state_survives_reload() -> Result<()> {
        init_test_tracing();
        let store = SeaOrmStore::new(setup_test_db().await?);
        let mut manager = MealManager::load(store).await;

        let injam = manager.add_member("Injam").await?.id();
        let hasan = manager.add_member("Hasan").await?.id();
        manager.add_individual_expense(injam, 1500.0, "Bazar").await?;
        manager
            .record_daily_meals(
                date(2026, 1, 14),
                [(injam, MealInput::new(1, 1)), (hasan, MealInput::new(1, 0))],
            )
            .await?;
        manager.add_to_shared_expense(300.0).await?;

        let (before, store) = manager.into_parts();
        let reloaded = MealManager::load(store).await;

        assert_eq!(reloaded.household(), &before);
        assert_eq!(reloaded.household().meal_rate(), 600.0);
        assert!(reloaded.household().audit().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_operation_writes_nothing() -> Result<()> {
        let mut manager = MealManager::load(MemoryStore::new()).await;

        let result = manager.subtract_from_shared_expense(10.0).await;
        assert!(matches!(result, Err(Error::InsufficientFunds { .. })));
        assert!(manager.store().is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_fail_the_operation() -> Result<()> {
        init_test_tracing();
        let mut manager = MealManager::load(FailingStore).await;

        let member = manager.add_member("Nadim").await?;
        let total = manager.add_to_shared_expense(250.0).await?;

        assert_eq!(member.id(), 1);
        assert_eq!(total, 250.0);
        assert_eq!(manager.household().shared_expense_total(), 250.0);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_members_skips_existing() -> Result<()> {
        let mut manager = MealManager::load(MemoryStore::new()).await;
        manager.add_member("Sakib").await?;

        let config = Config {
            members: vec![
                MemberConfig {
                    name: "sakib".to_string(),
                },
                MemberConfig {
                    name: "Dipto".to_string(),
                },
            ],
            ..Config::default()
        };

        assert_eq!(manager.seed_members(&config).await?, 1);
        assert_eq!(manager.seed_members(&config).await?, 0);

        let names: Vec<&str> = manager.household().members().iter().map(Member::name).collect();
        assert_eq!(names, vec!["Sakib", "Dipto"]);
        Ok(())
    }

    #[tokio::test]
    async fn test_seed_members_is_all_or_nothing() -> Result<()> {
        let mut manager = MealManager::load(MemoryStore::new()).await;

        let config = Config {
            members: vec![
                MemberConfig {
                    name: "Injam".to_string(),
                },
                MemberConfig {
                    name: "  ".to_string(),
                },
            ],
            ..Config::default()
        };

        let result = manager.seed_members(&config).await;

        assert!(matches!(result, Err(Error::Validation { message: _ })));
        assert!(manager.household().members().is_empty());
        assert!(manager.store().is_empty().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_sub_cent_individual_expense_is_rejected() -> Result<()> {
        let mut manager = MealManager::load(MemoryStore::new()).await;
        let id = manager.add_member("Injam").await?.id();
        let stored_before = manager.store().len().await;

        let result = manager.add_individual_expense(id, 0.004, "Salt").await;

        assert!(matches!(result, Err(Error::InvalidAmount { amount: _ })));
        let member = manager.household().member(id).unwrap();
        assert!(!member.has_paid());
        assert!(member.individual_expenses().is_empty());
        assert_eq!(manager.store().len().await, stored_before);
        Ok(())
    }

    #[tokio::test]
    async fn test_non_cent_amounts_keep_ledger_and_shared_total_in_step() -> Result<()> {
        let mut manager = MealManager::load(MemoryStore::new()).await;
        let id = manager.add_member("Hasan").await?.id();

        let transaction = manager.add_individual_expense(id, 100.005, "Bazar").await?;
        manager.add_to_shared_expense(19.999).await?;

        assert_eq!(transaction.amount, 100.01);
        let household = manager.household();
        let member = household.member(id).unwrap();
        let ledger_sum: f64 = member.individual_expenses().iter().map(|t| t.amount).sum();
        assert_eq!(ledger_sum, member.total_individual_expense());
        assert_eq!(household.shared_expense_total(), 120.01);
        assert!(household.audit().is_empty());

        let (_, store) = manager.into_parts();
        let shared: f64 = load_or_default(&store, SHARED_EXPENSE_KEY, || -1.0).await;
        assert_eq!(shared, 120.01);
        Ok(())
    }

    #[tokio::test]
    async fn test_individual_subtract_beyond_shared_total_persists_nothing() -> Result<()> {
        let mut manager = MealManager::load(MemoryStore::new()).await;
        let id = manager.add_member("Nadim").await?.id();
        manager.add_individual_expense(id, 300.0, "Bazar").await?;
        manager.subtract_from_shared_expense(250.0).await?;

        let result = manager.subtract_individual_expense(id, 100.0, "Refund").await;

        assert!(matches!(
            result,
            Err(Error::InsufficientFunds {
                current: 50.0,
                required: 100.0
            })
        ));
        assert_eq!(
            manager.household().member(id).unwrap().total_individual_expense(),
            300.0
        );

        let (_, store) = manager.into_parts();
        let shared: f64 = load_or_default(&store, SHARED_EXPENSE_KEY, || -1.0).await;
        let members: Vec<Member> = load_or_default(&store, MEMBERS_KEY, Vec::new).await;
        assert_eq!(shared, 50.0);
        assert_eq!(members[0].total_individual_expense(), 300.0);
        assert_eq!(members[0].individual_expenses().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_subtract_individual_expense_persists_both_slices() -> Result<()> {
        let mut manager = MealManager::load(MemoryStore::new()).await;
        let id = manager.add_member("Samir").await?.id();
        manager.add_individual_expense(id, 100.0, "Rice").await?;
        manager.subtract_individual_expense(id, 40.0, "Refund").await?;

        let (_, store) = manager.into_parts();
        let shared: f64 = load_or_default(&store, SHARED_EXPENSE_KEY, || -1.0).await;
        let members: Vec<Member> = load_or_default(&store, MEMBERS_KEY, Vec::new).await;

        assert_eq!(shared, 60.0);
        assert_eq!(members[0].total_individual_expense(), 60.0);
        assert_eq!(members[0].individual_expenses().len(), 2);
        Ok(())
    }
}
