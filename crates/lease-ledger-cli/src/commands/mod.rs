pub mod lease;
pub mod portfolio;
