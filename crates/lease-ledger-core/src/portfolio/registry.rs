//! Named lease registry owned by the caller.
//!
//! The engine itself keeps no state between calls; callers that want to keep
//! a set of named leases around implement [`LeaseStore`] over whatever
//! backend they use. Saving is an explicit replace keyed on the lease name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lease::amortization::{compute_schedule, ScheduleRow};
use crate::lease::journal::{compute_journal, JournalLine};
use crate::lease::terms::LeaseInput;
use crate::LeaseResult;

/// A lease together with the schedule and journal computed from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLease {
    pub input: LeaseInput,
    pub schedule: Vec<ScheduleRow>,
    pub journal: Vec<JournalLine>,
}

impl SavedLease {
    /// Compute the schedule and journal for a lease.
    pub fn compute(input: LeaseInput) -> LeaseResult<Self> {
        let schedule = compute_schedule(&input)?;
        let journal = compute_journal(&schedule, input.lease_type);
        Ok(Self {
            input,
            schedule,
            journal,
        })
    }
}

/// Keyed store of saved leases.
pub trait LeaseStore {
    /// Insert or replace the lease saved under `name`, returning the
    /// previous entry if there was one.
    fn upsert(&mut self, name: &str, lease: SavedLease) -> LeaseResult<Option<SavedLease>>;

    fn get(&self, name: &str) -> LeaseResult<Option<SavedLease>>;

    fn remove(&mut self, name: &str) -> LeaseResult<Option<SavedLease>>;

    /// Lease names in ascending order.
    fn names(&self) -> LeaseResult<Vec<String>>;

    /// Schedules of every saved lease, ready for aggregation.
    fn schedules(&self) -> LeaseResult<BTreeMap<String, Vec<ScheduleRow>>> {
        let mut out = BTreeMap::new();
        for name in self.names()? {
            if let Some(lease) = self.get(&name)? {
                out.insert(name, lease.schedule);
            }
        }
        Ok(out)
    }
}

/// In-memory [`LeaseStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryLeaseStore {
    leases: BTreeMap<String, SavedLease>,
}

impl MemoryLeaseStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.leases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leases.is_empty()
    }
}

impl LeaseStore for MemoryLeaseStore {
    fn upsert(&mut self, name: &str, lease: SavedLease) -> LeaseResult<Option<SavedLease>> {
        let previous = self.leases.insert(name.to_string(), lease);
        debug!(lease = name, replaced = previous.is_some(), "saved lease");
        Ok(previous)
    }

    fn get(&self, name: &str) -> LeaseResult<Option<SavedLease>> {
        Ok(self.leases.get(name).cloned())
    }

    fn remove(&mut self, name: &str) -> LeaseResult<Option<SavedLease>> {
        Ok(self.leases.remove(name))
    }

    fn names(&self) -> LeaseResult<Vec<String>> {
        Ok(self.leases.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lease::terms::{LeaseType, PaymentTiming, RouClampPolicy};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn input(term: u32) -> LeaseInput {
        LeaseInput {
            lease_term: term,
            base_payment: dec!(1200),
            annual_discount_rate: dec!(0.05),
            annual_escalation_rate: dec!(0.02),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            payment_timing: PaymentTiming::Arrears,
            lease_type: LeaseType::Finance,
            rou_clamp: RouClampPolicy::ReportOnly,
        }
    }

    #[test]
    fn test_upsert_replaces_existing_entry() {
        let mut store = MemoryLeaseStore::new();
        assert!(store.upsert("hq", SavedLease::compute(input(12)).unwrap()).unwrap().is_none());

        let previous = store
            .upsert("hq", SavedLease::compute(input(24)).unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(previous.schedule.len(), 12);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("hq").unwrap().unwrap().schedule.len(), 24);
    }

    #[test]
    fn test_remove_and_names() {
        let mut store = MemoryLeaseStore::new();
        store.upsert("b", SavedLease::compute(input(6)).unwrap()).unwrap();
        store.upsert("a", SavedLease::compute(input(6)).unwrap()).unwrap();
        assert_eq!(store.names().unwrap(), vec!["a".to_string(), "b".to_string()]);

        assert!(store.remove("a").unwrap().is_some());
        assert!(store.remove("a").unwrap().is_none());
        assert_eq!(store.schedules().unwrap().len(), 1);
    }

    #[test]
    fn test_saved_lease_carries_journal() {
        let saved = SavedLease::compute(input(3)).unwrap();
        assert_eq!(saved.journal.len(), 3 * 5);
    }

    #[test]
    fn test_invalid_input_is_not_saved() {
        assert!(SavedLease::compute(input(0)).is_err());
    }
}
