//! Account system for Storefront
//!
//! Accounts with optional password authentication, and the one-to-one profile
//! records that extend them.

pub mod crypto;
pub mod errors;
pub mod lifecycle;
pub mod types;

pub use errors::AccountError;
pub use lifecycle::SaveEvent;
pub use types::*;
