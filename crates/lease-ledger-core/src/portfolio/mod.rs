pub mod aggregate;
pub mod registry;

pub use aggregate::{aggregate_portfolio, DateRange, GroupKey, GroupMode, PortfolioRow};
pub use registry::{LeaseStore, MemoryLeaseStore, SavedLease};
