pub mod error;
pub mod lease;
pub mod time_value;
pub mod types;

#[cfg(feature = "portfolio")]
pub mod portfolio;

#[cfg(feature = "records")]
pub mod records;

pub use error::LeaseError;
pub use types::*;

/// Standard result type for all lease-ledger operations
pub type LeaseResult<T> = Result<T, LeaseError>;
