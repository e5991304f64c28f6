//! Storage backends for accounts and profiles
//!
//! The [`BackendImpl`] trait is the persistence seam used by [`crate::Storefront`].
//! Backends store plain records; the account/profile lifecycle lives in the
//! account service, not here. The one invariant backends do enforce is storage-level
//! uniqueness: one account per id and username, and at most one profile per account.

use std::any::Any;

use async_trait::async_trait;

use crate::Result;
use crate::account::{AccountId, AccountInfo, Profile};

pub mod database;
pub mod errors;

pub use errors::BackendError;

/// Persistence interface for account and profile records.
///
/// All implementations must be `Send` and `Sync` so a single backend can be shared
/// across request handlers, and implement `Any` to allow downcasting (the server uses
/// this to save the in-memory backend on shutdown).
#[async_trait]
pub trait BackendImpl: Send + Sync + Any {
    /// Store a new account.
    ///
    /// Fails with [`BackendError::AccountAlreadyExists`] if the id or username is taken.
    async fn insert_account(&self, info: &AccountInfo) -> Result<()>;

    /// Overwrite an existing account record.
    ///
    /// Fails with [`BackendError::AccountNotFound`] if no account has this id.
    async fn update_account(&self, info: &AccountInfo) -> Result<()>;

    /// Fetch an account by id.
    async fn get_account(&self, id: &AccountId) -> Result<AccountInfo>;

    /// Fetch an account by username, if one exists.
    async fn find_account(&self, username: &str) -> Result<Option<AccountInfo>>;

    /// All accounts, ordered by username.
    async fn list_accounts(&self) -> Result<Vec<AccountInfo>>;

    /// Store a new profile.
    ///
    /// Fails with [`BackendError::ProfileAlreadyExists`] if the account already has one.
    async fn insert_profile(&self, profile: &Profile) -> Result<()>;

    /// Overwrite the stored profile of `profile.account_id()`.
    ///
    /// Never inserts: fails with [`BackendError::ProfileNotFound`] if the account has
    /// no stored profile. The stored creation timestamp is kept.
    async fn save_profile(&self, profile: &Profile) -> Result<()>;

    /// Fetch the profile belonging to an account, if any.
    async fn get_profile(&self, account_id: &AccountId) -> Result<Option<Profile>>;

    /// All profiles.
    async fn list_profiles(&self) -> Result<Vec<Profile>>;

    /// Short backend name used in health output.
    fn backend_name(&self) -> &'static str;

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
