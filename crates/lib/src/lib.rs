//!
//! Storefront: account, profile and access-control core for the store API.
//!
//! ## Core Concepts
//!
//! * **Accounts (`account::Account`)**: authenticated identities. Every account owns exactly
//!   one `account::Profile`, created and kept in sync by the account service.
//! * **Storefront (`Storefront`)**: the application service. It is the only code path that
//!   creates or saves accounts, and it runs the profile lifecycle on every save.
//! * **Backends (`backend::BackendImpl`)**: pluggable persistence for accounts and profiles
//!   (in-memory with JSON persistence, SQLite, PostgreSQL).
//! * **Access gate (`access`)**: request-time read/write policy with an explicit
//!   unauthorized/forbidden denial kind.
//! * **Routes (`routes::RouteTable`)**: the store API's named URL patterns with matching
//!   and reverse lookup.

pub mod access;
pub mod account;
pub mod backend;
pub mod clock;
pub mod instance;
pub mod routes;

pub use clock::{Clock, SystemClock};
#[cfg(any(test, feature = "testing"))]
pub use clock::FixedClock;
pub use instance::Storefront;

/// Result type used throughout the Storefront library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Storefront library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Structured account errors from the account module
    #[error(transparent)]
    Account(account::AccountError),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured routing errors from the routes module
    #[error(transparent)]
    Route(routes::RouteError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Account(_) => "account",
            Error::Backend(_) => "backend",
            Error::Route(_) => "routes",
            Error::Io(_) => "io",
            Error::Serialize(_) => "serialize",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Account(account_err) => account_err.is_not_found(),
            Error::Backend(backend_err) => backend_err.is_not_found(),
            Error::Route(route_err) => route_err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::Account(account_err) => account_err.is_conflict(),
            Error::Backend(backend_err) => backend_err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error is credential-related.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::Account(account_err) => account_err.is_authentication_error(),
            _ => false,
        }
    }

    /// Check if this error was caused by invalid caller input.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::Account(account_err) => account_err.is_validation_error(),
            Error::Route(route_err) => route_err.is_validation_error(),
            _ => false,
        }
    }

    /// Check if this error is storage-related.
    pub fn is_database_error(&self) -> bool {
        matches!(self, Error::Backend(_))
    }
}
