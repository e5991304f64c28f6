//! Error types for the account system
use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Account not found: {account}")]
    AccountNotFound { account: String },

    #[error("Username already exists: {username}")]
    UsernameAlreadyExists { username: String },

    #[error("Invalid username '{username}': {reason}")]
    InvalidUsername { username: String, reason: String },

    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    #[error("Invalid account id: {value}")]
    InvalidAccountId { value: String },

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Password required to log in as {username}")]
    PasswordRequired { username: String },

    #[error("Password verification failed")]
    PasswordVerificationFailed,

    #[error("Password hashing failed: {reason}")]
    PasswordHashingFailed { reason: String },

    #[error("Account disabled: {username}")]
    AccountDisabled { username: String },

    #[error("Profile of account {profile_account} is attached to account {account}")]
    ProfileMismatch {
        account: String,
        profile_account: String,
    },
}

impl AccountError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AccountError::AccountNotFound { .. })
    }

    /// Check if this error indicates the account already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, AccountError::UsernameAlreadyExists { .. })
    }

    /// Check if this error came from checking credentials.
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            AccountError::InvalidPassword
                | AccountError::PasswordRequired { .. }
                | AccountError::PasswordVerificationFailed
                | AccountError::AccountDisabled { .. }
        )
    }

    /// Check if this error was caused by invalid input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            AccountError::InvalidUsername { .. }
                | AccountError::InvalidEmail { .. }
                | AccountError::InvalidAccountId { .. }
                | AccountError::ProfileMismatch { .. }
        )
    }
}

impl From<AccountError> for crate::Error {
    fn from(err: AccountError) -> Self {
        crate::Error::Account(err)
    }
}
