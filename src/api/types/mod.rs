//! API response and request types for the Crypto Pay API.
//!
//! This module contains all the type definitions used by the API client,
//! organized by category.

pub mod app;
pub mod balance;
pub mod check;
pub mod currency;
pub mod invoice;
pub mod transfer;

// Re-export all types for convenience
pub use app::*;
pub use balance::*;
pub use check::*;
pub use currency::*;
pub use invoice::*;
pub use transfer::*;
