pub mod amortization;
pub mod payments;
pub mod terms;

#[cfg(feature = "journal")]
pub mod journal;

pub use amortization::{compute_schedule, measure_lease, LeaseSchedule, ScheduleRow};
pub use terms::{LeaseInput, LeaseType, PaymentTiming, RouClampPolicy};

#[cfg(feature = "journal")]
pub use journal::{compute_journal, Account, JournalLine};
