//! Storage error types for the Storefront backends.

use thiserror::Error;

use crate::account::AccountId;

/// Errors that can occur during storage operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Account not found by id.
    #[error("Account not found: {id}")]
    AccountNotFound {
        /// The id that was looked up
        id: AccountId,
    },

    /// No profile is stored for this account.
    #[error("Profile not found for account {account_id}")]
    ProfileNotFound {
        /// The account whose profile was looked up
        account_id: AccountId,
    },

    /// An account with this id or username is already stored.
    #[error("Account already exists: {username}")]
    AccountAlreadyExists {
        /// Username of the rejected record
        username: String,
    },

    /// The account already has a profile. Profiles are one-to-one with accounts.
    #[error("Profile already exists for account {account_id}")]
    ProfileAlreadyExists {
        /// Account the duplicate profile was created for
        account_id: AccountId,
    },

    /// A stored row could not be turned back into a record.
    #[error("Corrupt record: {reason}")]
    CorruptRecord {
        /// What was wrong with the row
        reason: String,
    },

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        #[source]
        source: std::io::Error,
    },

    /// SQL database error.
    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Description of what failed
        reason: String,
        /// The underlying driver error, if any
        #[source]
        source: Option<sqlx::Error>,
    },
}

impl BackendError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            BackendError::AccountNotFound { .. } | BackendError::ProfileNotFound { .. }
        )
    }

    /// Check if this error is a uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BackendError::AccountAlreadyExists { .. } | BackendError::ProfileAlreadyExists { .. }
        )
    }

    /// Check if this error indicates stored data could not be read back.
    pub fn is_integrity_error(&self) -> bool {
        matches!(
            self,
            BackendError::CorruptRecord { .. } | BackendError::DeserializationFailed { .. }
        )
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, BackendError::FileIo { .. })
    }
}

impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
